use crate::domain::model::{EventRecord, LogFormat};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// `YYYYMMDD HHMMSSss`, hundredths ignored.
const CATALOG_PATTERN: &str = r"(\d{8}) (\d{6})\d{2}";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%dT%H:%M:%S",
];

#[derive(Debug, Clone)]
pub struct ParsedLog {
    pub events: Vec<EventRecord>,
    pub skipped: usize,
}

/// Turns raw event log bytes into typed records.
///
/// Lenient by default: lines that do not parse are counted in
/// [`ParsedLog::skipped`] and dropped. In strict mode the first bad line
/// aborts with [`EtlError::MalformedEventRecord`].
pub struct EventLogParser {
    format: LogFormat,
    strict: bool,
    catalog_re: Regex,
}

impl EventLogParser {
    pub fn new(format: LogFormat, strict: bool) -> Result<Self> {
        let catalog_re = Regex::new(CATALOG_PATTERN).map_err(|e| EtlError::ConfigValidationError {
            field: "catalog_pattern".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            format,
            strict,
            catalog_re,
        })
    }

    pub fn parse_bytes(&self, data: &[u8]) -> Result<ParsedLog> {
        // 只取第一個逗號欄位, 與目錄檔的欄位格式一致
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(data);

        let mut events = Vec::new();
        let mut skipped = 0;

        // 以位元組讀取, 非 UTF-8 的行與其他壞行一樣處理
        for row in reader.byte_records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let parsed = match std::str::from_utf8(row.get(0).unwrap_or_default()) {
                Ok(first) if first.trim().is_empty() => continue,
                Ok(first) => self.parse_line(first.trim()),
                Err(e) => Err(format!("line is not valid UTF-8: {}", e)),
            };

            match parsed {
                Ok(event) => events.push(event),
                Err(reason) if self.strict => {
                    return Err(EtlError::MalformedEventRecord { line, reason });
                }
                Err(reason) => {
                    tracing::warn!("Skipping line {}: {}", line, reason);
                    skipped += 1;
                }
            }
        }

        tracing::debug!(
            "Parsed {} events ({} skipped) from {} log",
            events.len(),
            skipped,
            self.format
        );

        Ok(ParsedLog { events, skipped })
    }

    /// Parses the first field of one log line.
    pub fn parse_line(&self, field: &str) -> std::result::Result<EventRecord, String> {
        match self.format {
            LogFormat::Catalog => self.parse_catalog(field),
            LogFormat::Automatic => parse_automatic(field),
        }
    }

    fn parse_catalog(&self, field: &str) -> std::result::Result<EventRecord, String> {
        let caps = self
            .catalog_re
            .captures(field)
            .ok_or_else(|| format!("no 'YYYYMMDD HHMMSSss' origin time in '{}'", field))?;

        let date = NaiveDate::parse_from_str(&caps[1], "%Y%m%d")
            .map_err(|e| format!("bad date '{}': {}", &caps[1], e))?;
        let time = NaiveTime::parse_from_str(&caps[2], "%H%M%S")
            .map_err(|e| format!("bad time '{}': {}", &caps[2], e))?;

        Ok(EventRecord::new(None, date.and_time(time)))
    }
}

fn parse_automatic(field: &str) -> std::result::Result<EventRecord, String> {
    let mut parts = field.split_whitespace();
    let (id, raw_ts) = match (parts.next(), parts.next()) {
        (Some(id), Some(ts)) => (id, ts),
        _ => return Err(format!("expected '<event-id> <timestamp>', got '{}'", field)),
    };

    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| format!("bad timestamp '{}'", raw_ts))?;
    Ok(EventRecord::new(Some(id.to_string()), timestamp))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    // 帶時區的時間保留原本的當地時間
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_catalog_line() {
        let parser = EventLogParser::new(LogFormat::Catalog, true).unwrap();
        let data = b"20240324 10153042  9.8812 -84.1002  12.3 3.1\n";
        let parsed = parser.parse_bytes(data).unwrap();
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].timestamp, ts(2024, 3, 24, 10, 15, 30));
        assert_eq!(parsed.events[0].event_id, None);
    }

    #[test]
    fn test_catalog_uses_first_comma_field_only() {
        let parser = EventLogParser::new(LogFormat::Catalog, true).unwrap();
        let data = b"ovsicori 20230402 23595999,extra,20990101 00000000\n";
        let parsed = parser.parse_bytes(data).unwrap();
        assert_eq!(parsed.events[0].timestamp, ts(2023, 4, 2, 23, 59, 59));
    }

    #[test]
    fn test_automatic_lines() {
        let parser = EventLogParser::new(LogFormat::Automatic, true).unwrap();
        let data = b"ovsicori2022abcd 2022-01-05T12:34:56.120\n\
                     ovsicori2022abce 2022-01-06T01:02:03\n\
                     ovsicori2022abcf 2022-01-07T08:00:00-06:00\n\
                     ovsicori2022abcg 2022-01-08\n";
        let parsed = parser.parse_bytes(data).unwrap();
        assert_eq!(parsed.events.len(), 4);
        assert_eq!(parsed.events[0].event_id.as_deref(), Some("ovsicori2022abcd"));
        assert_eq!(parsed.events[1].timestamp, ts(2022, 1, 6, 1, 2, 3));
        assert_eq!(parsed.events[2].timestamp, ts(2022, 1, 7, 8, 0, 0));
        assert_eq!(parsed.events[3].timestamp, ts(2022, 1, 8, 0, 0, 0));
    }

    #[test]
    fn test_lenient_skips_bad_lines() {
        let parser = EventLogParser::new(LogFormat::Catalog, false).unwrap();
        let data = b"20240324 10153042\nheader line\n\n20241399 00000000\n20240401 00000000\n";
        let parsed = parser.parse_bytes(data).unwrap();
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn test_lenient_skips_non_utf8_lines() {
        let parser = EventLogParser::new(LogFormat::Catalog, false).unwrap();
        let data = b"20240324 10153042\n\xff\xfe garbage\n20240401 00000000\n";
        let parsed = parser.parse_bytes(data).unwrap();
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.events[1].timestamp, ts(2024, 4, 1, 0, 0, 0));
    }

    #[test]
    fn test_strict_rejects_non_utf8_line() {
        let parser = EventLogParser::new(LogFormat::Automatic, true).unwrap();
        let data = b"a1 2022-01-05T12:34:56\n\xc3\x28 2022-01-06T00:00:00\n";
        match parser.parse_bytes(data) {
            Err(EtlError::MalformedEventRecord { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("expected MalformedEventRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_reports_line_number() {
        let parser = EventLogParser::new(LogFormat::Automatic, true).unwrap();
        let data = b"a1 2022-01-05T12:34:56\na2 not-a-date\n";
        match parser.parse_bytes(data) {
            Err(EtlError::MalformedEventRecord { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("not-a-date"));
            }
            other => panic!("expected MalformedEventRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_catalog_time_rejected() {
        let parser = EventLogParser::new(LogFormat::Catalog, true).unwrap();
        assert!(parser.parse_line("20240324 25000000").is_err());
    }
}
