pub mod cli;
pub mod toml_config;

use crate::domain::model::TimeWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{CalendarYear, LogFormat};
#[cfg(feature = "cli")]
use crate::utils::error::{EtlError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::ops::RangeInclusive;

pub const DEFAULT_SERIES_YEARS: (i32, i32) = (2010, 2024);
pub const DEFAULT_COMPARISON_YEARS: (i32, i32) = (2010, 2023);
/// Daily chart x-axis when neither a chart window nor a daily range is set.
pub const DEFAULT_DAILY_CHART_WINDOW: ((i32, u32, u32), (i32, u32, u32)) =
    ((2022, 1, 1), (2024, 1, 31));

pub fn default_daily_chart_window() -> Option<TimeWindow> {
    let ((y0, m0, d0), (y1, m1, d1)) = DEFAULT_DAILY_CHART_WINDOW;
    Some(TimeWindow::new(
        NaiveDate::from_ymd_opt(y0, m0, d0)?,
        NaiveDate::from_ymd_opt(y1, m1, d1)?,
    ))
}

/// Explicit chart bounds win, then the daily counting range, then the default.
pub(crate) fn resolve_chart_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    daily_range: Option<TimeWindow>,
) -> Option<TimeWindow> {
    match (start, end) {
        (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
        _ => daily_range.or_else(default_daily_chart_window),
    }
}

/// Which analysis a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    HolyWeek,
    Daily,
    All,
}

impl ReportKind {
    pub fn includes_holy_week(self) -> bool {
        matches!(self, ReportKind::HolyWeek | ReportKind::All)
    }

    pub fn includes_daily(self) -> bool {
        matches!(self, ReportKind::Daily | ReportKind::All)
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "holy-week" => Ok(ReportKind::HolyWeek),
            "daily" => Ok(ReportKind::Daily),
            "all" => Ok(ReportKind::All),
            other => Err(format!(
                "unknown report '{}', expected 'holy-week', 'daily' or 'all'",
                other
            )),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::HolyWeek => f.write_str("holy-week"),
            ReportKind::Daily => f.write_str("daily"),
            ReportKind::All => f.write_str("all"),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sismo-etl")]
#[command(about = "Seismic event log statistics: holy week windows and daily counts")]
pub struct CliConfig {
    /// Event log to analyse
    #[arg(long)]
    pub input: String,

    /// Log layout: 'catalog' or 'automatic'
    #[arg(long, default_value = "catalog")]
    pub format: LogFormat,

    /// Report to produce: 'holy-week', 'daily' or 'all'
    #[arg(long, default_value = "holy-week")]
    pub report: ReportKind,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value_t = DEFAULT_SERIES_YEARS.0)]
    pub series_start: CalendarYear,

    #[arg(long, default_value_t = DEFAULT_SERIES_YEARS.1)]
    pub series_end: CalendarYear,

    #[arg(long, default_value_t = DEFAULT_COMPARISON_YEARS.0)]
    pub comparison_start: CalendarYear,

    #[arg(long, default_value_t = DEFAULT_COMPARISON_YEARS.1)]
    pub comparison_end: CalendarYear,

    /// First day of the daily report (YYYY-MM-DD)
    #[arg(long)]
    pub daily_start: Option<NaiveDate>,

    /// Last day of the daily report (YYYY-MM-DD)
    #[arg(long)]
    pub daily_end: Option<NaiveDate>,

    /// First day shown on the daily chart (default 2022-01-01)
    #[arg(long)]
    pub chart_start: Option<NaiveDate>,

    /// Last day shown on the daily chart (default 2024-01-31)
    #[arg(long)]
    pub chart_end: Option<NaiveDate>,

    /// Reject the whole log on the first malformed line
    #[arg(long)]
    pub strict: bool,

    /// Skip PNG chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Also bundle every output file into this ZIP archive
    #[arg(long)]
    pub archive: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Enable system monitoring
    #[arg(long)]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn log_format(&self) -> LogFormat {
        self.format
    }

    fn strict_parsing(&self) -> bool {
        self.strict
    }

    fn render_charts(&self) -> bool {
        !self.no_charts
    }

    fn archive_name(&self) -> Option<&str> {
        self.archive.as_deref()
    }

    fn series_years(&self) -> RangeInclusive<CalendarYear> {
        self.series_start..=self.series_end
    }

    fn comparison_years(&self) -> RangeInclusive<CalendarYear> {
        self.comparison_start..=self.comparison_end
    }

    fn daily_range(&self) -> Option<TimeWindow> {
        match (self.daily_start, self.daily_end) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        }
    }

    fn daily_chart_window(&self) -> Option<TimeWindow> {
        resolve_chart_window(self.chart_start, self.chart_end, self.daily_range())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_year_span("series_years", self.series_start, self.series_end)?;
        validation::validate_year_span(
            "comparison_years",
            self.comparison_start,
            self.comparison_end,
        )?;

        match (self.daily_start, self.daily_end) {
            (Some(start), Some(end)) => {
                validation::validate_window(&TimeWindow::new(start, end))?;
            }
            (None, None) => {}
            (Some(_), None) => {
                return Err(EtlError::MissingConfigError {
                    field: "daily_end".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(EtlError::MissingConfigError {
                    field: "daily_start".to_string(),
                })
            }
        }

        match (self.chart_start, self.chart_end) {
            (Some(start), Some(end)) => {
                validation::validate_window(&TimeWindow::new(start, end))?;
            }
            (None, None) => {}
            (Some(_), None) => {
                return Err(EtlError::MissingConfigError {
                    field: "chart_end".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(EtlError::MissingConfigError {
                    field: "chart_start".to_string(),
                })
            }
        }

        if let Some(name) = &self.archive {
            validation::validate_non_empty_string("archive", name)?;
        }

        Ok(())
    }
}
