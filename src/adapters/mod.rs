// Adapters layer: concrete implementations for external systems (event log files, chart images).

pub mod chart;
pub mod event_log;

pub use event_log::{EventLogParser, ParsedLog};
