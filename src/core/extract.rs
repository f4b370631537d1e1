use crate::adapters::event_log::EventLogParser;
use crate::core::{ConfigProvider, EventRecord, Storage};
use crate::utils::error::Result;

/// Reads the configured event log through `source` and parses it.
pub async fn extract_events<S: Storage, C: ConfigProvider>(
    source: &S,
    config: &C,
) -> Result<Vec<EventRecord>> {
    tracing::debug!(
        "Reading {} log from: {}",
        config.log_format(),
        config.input_path()
    );
    let raw = source.read_file(config.input_path()).await?;

    let parser = EventLogParser::new(config.log_format(), config.strict_parsing())?;
    let parsed = parser.parse_bytes(&raw)?;

    if parsed.skipped > 0 {
        tracing::warn!(
            "⚠️ Skipped {} malformed lines in {}",
            parsed.skipped,
            config.input_path()
        );
    }

    Ok(parsed.events)
}
