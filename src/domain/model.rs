use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gregorian calendar year.
pub type CalendarYear = i32;

/// One detected seismic event, as parsed from the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl EventRecord {
    pub fn new(event_id: Option<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            event_id,
            timestamp,
        }
    }

    /// Calendar day of the event; time of day is dropped.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Closed date interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// The three consecutive weeks around Easter for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolyWeekWindows {
    pub year: CalendarYear,
    pub anchor: NaiveDate,
    pub week_before: TimeWindow,
    pub holy_week: TimeWindow,
    pub week_after: TimeWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowCounts {
    pub year: CalendarYear,
    #[serde(rename = "week_before")]
    pub before: usize,
    #[serde(rename = "holy_week")]
    pub during: usize,
    #[serde(rename = "week_after")]
    pub after: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: CalendarYear,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Layout of the event log on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Catalog lines carrying `YYYYMMDD HHMMSSss` inside the first field.
    #[default]
    Catalog,
    /// `<event-id> <timestamp>` lines from the automatic detection feed.
    Automatic,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "catalog" => Ok(LogFormat::Catalog),
            "automatic" => Ok(LogFormat::Automatic),
            other => Err(format!(
                "unknown log format '{}', expected 'catalog' or 'automatic'",
                other
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Catalog => f.write_str("catalog"),
            LogFormat::Automatic => f.write_str("automatic"),
        }
    }
}

/// PNG charts a run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    HolyWeekSeries,
    HolyWeekComparison,
    DailyEvents,
}

impl ChartKind {
    pub fn default_filename(self) -> &'static str {
        match self {
            ChartKind::HolyWeekSeries => "holy_week_series.png",
            ChartKind::HolyWeekComparison => "holy_week_comparison.png",
            ChartKind::DailyEvents => "events_per_day.png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolyWeekReport {
    pub series: Vec<YearCount>,
    pub comparison: Vec<WindowCounts>,
    pub windows: Vec<HolyWeekWindows>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub range: Option<TimeWindow>,
    pub days: Vec<DailyCount>,
}

/// Anything a pipeline hands from transform to load.
pub trait Report: Send + Sync {
    fn row_count(&self) -> usize;
}

impl Report for HolyWeekReport {
    fn row_count(&self) -> usize {
        self.series.len() + self.comparison.len()
    }
}

impl Report for DailyReport {
    fn row_count(&self) -> usize {
        self.days.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_contains_both_ends() {
        let window = TimeWindow::new(date(2024, 3, 24), date(2024, 3, 30));
        assert!(window.contains(date(2024, 3, 24)));
        assert!(window.contains(date(2024, 3, 30)));
        assert!(!window.contains(date(2024, 3, 23)));
        assert!(!window.contains(date(2024, 3, 31)));
        assert_eq!(window.len_days(), 7);
    }

    #[test]
    fn test_event_date_drops_time() {
        let ts = date(2024, 3, 30).and_hms_opt(23, 59, 0).unwrap();
        let event = EventRecord::new(None, ts);
        assert_eq!(event.date(), date(2024, 3, 30));
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("catalog".parse::<LogFormat>().unwrap(), LogFormat::Catalog);
        assert_eq!("Automatic".parse::<LogFormat>().unwrap(), LogFormat::Automatic);
        assert!("csv".parse::<LogFormat>().is_err());
    }
}
