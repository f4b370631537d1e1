use crate::config::{
    resolve_chart_window, ReportKind, DEFAULT_COMPARISON_YEARS, DEFAULT_SERIES_YEARS,
};
use crate::core::ConfigProvider;
use crate::domain::model::{CalendarYear, ChartKind, LogFormat, TimeWindow};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default = "default_reports")]
    pub reports: Vec<ReportKind>,
    #[serde(default)]
    pub holy_week: HolyWeekConfig,
    #[serde(default)]
    pub daily: DailyConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    #[serde(default)]
    pub format: LogFormat,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolyWeekConfig {
    #[serde(default = "default_series_years")]
    pub series_years: [CalendarYear; 2],
    #[serde(default = "default_comparison_years")]
    pub comparison_years: [CalendarYear; 2],
}

impl Default for HolyWeekConfig {
    fn default() -> Self {
        Self {
            series_years: default_series_years(),
            comparison_years: default_comparison_years(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyConfig {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub chart_start: Option<NaiveDate>,
    pub chart_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub charts: Option<bool>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

/// Chart file name overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub series_chart: Option<String>,
    pub comparison_chart: Option<String>,
    pub daily_chart: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn default_reports() -> Vec<ReportKind> {
    vec![ReportKind::HolyWeek]
}

fn default_series_years() -> [CalendarYear; 2] {
    [DEFAULT_SERIES_YEARS.0, DEFAULT_SERIES_YEARS.1]
}

fn default_comparison_years() -> [CalendarYear; 2] {
    [DEFAULT_COMPARISON_YEARS.0, DEFAULT_COMPARISON_YEARS.1]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EVENT_LOG}), 未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if self.reports.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "reports".to_string(),
            });
        }

        let [s0, s1] = self.holy_week.series_years;
        validation::validate_year_span("holy_week.series_years", s0, s1)?;
        let [c0, c1] = self.holy_week.comparison_years;
        validation::validate_year_span("holy_week.comparison_years", c0, c1)?;

        // 起訖日期要同時設定
        if self.daily.start.is_some() || self.daily.end.is_some() {
            let start = validation::validate_required_field("daily.start", &self.daily.start)?;
            let end = validation::validate_required_field("daily.end", &self.daily.end)?;
            validation::validate_window(&TimeWindow::new(*start, *end))?;
        }
        if self.daily.chart_start.is_some() || self.daily.chart_end.is_some() {
            let start =
                validation::validate_required_field("daily.chart_start", &self.daily.chart_start)?;
            let end = validation::validate_required_field("daily.chart_end", &self.daily.chart_end)?;
            validation::validate_window(&TimeWindow::new(*start, *end))?;
        }

        if let Some(compression) = &self.load.compression {
            if compression.enabled {
                validation::validate_non_empty_string(
                    "load.compression.filename",
                    &compression.filename,
                )?;
            }
        }

        Ok(())
    }

    pub fn includes(&self, kind: ReportKind) -> bool {
        self.reports
            .iter()
            .any(|r| *r == kind || *r == ReportKind::All)
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn log_format(&self) -> LogFormat {
        self.source.format
    }

    fn strict_parsing(&self) -> bool {
        self.source.strict.unwrap_or(false)
    }

    fn render_charts(&self) -> bool {
        self.load.charts.unwrap_or(true)
    }

    fn archive_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn series_years(&self) -> RangeInclusive<CalendarYear> {
        let [start, end] = self.holy_week.series_years;
        start..=end
    }

    fn comparison_years(&self) -> RangeInclusive<CalendarYear> {
        let [start, end] = self.holy_week.comparison_years;
        start..=end
    }

    fn daily_range(&self) -> Option<TimeWindow> {
        match (self.daily.start, self.daily.end) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        }
    }

    fn daily_chart_window(&self) -> Option<TimeWindow> {
        resolve_chart_window(
            self.daily.chart_start,
            self.daily.chart_end,
            self.daily_range(),
        )
    }

    fn chart_filename(&self, kind: ChartKind) -> String {
        let names = self.load.filenames.as_ref();
        let custom = match kind {
            ChartKind::HolyWeekSeries => names.and_then(|n| n.series_chart.clone()),
            ChartKind::HolyWeekComparison => names.and_then(|n| n.comparison_chart.clone()),
            ChartKind::DailyEvents => names.and_then(|n| n.daily_chart.clone()),
        };
        custom.unwrap_or_else(|| kind.default_filename().to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[pipeline]
name = "semana-santa"
description = "Holy week seismicity"
version = "1.0.0"

[source]
path = "generalseismicity.event.cat"

[load]
output_path = "./test-output"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.pipeline.name, "semana-santa");
        assert_eq!(config.log_format(), LogFormat::Catalog);
        assert_eq!(config.series_years(), 2010..=2024);
        assert_eq!(config.comparison_years(), 2010..=2023);
        assert!(config.includes(ReportKind::HolyWeek));
        assert!(!config.includes(ReportKind::Daily));
        assert!(config.render_charts());
        assert!(config.archive_name().is_none());
        assert!(config.validate().is_ok());

        // 預設統計全部事件, 圖表只顯示 2022-01 到 2024-01
        assert_eq!(config.daily_range(), None);
        let chart = config.daily_chart_window().unwrap();
        assert_eq!(chart.start, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(chart.end, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_daily_chart_window_from_toml() {
        let toml_content = BASIC.replace(
            "[load]",
            "[daily]\nchart_start = \"2023-01-01\"\nchart_end = \"2023-12-31\"\n\n[load]",
        );
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.daily_range(), None);
        assert_eq!(config.daily_chart_window().unwrap().len_days(), 365);
        assert!(config.validate().is_ok());

        let toml_content = BASIC.replace("[load]", "[daily]\nchart_end = \"2023-12-31\"\n\n[load]");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_full_toml_config() {
        let toml_content = r#"
reports = ["all"]

[pipeline]
name = "earthbeat"
description = "Automatic events"
version = "2.0"

[source]
path = "last_events_detected.dat"
format = "automatic"
strict = true

[holy_week]
series_years = [2015, 2020]
comparison_years = [2016, 2019]

[daily]
start = "2022-01-01"
end = "2024-01-31"

[load]
output_path = "./out"
charts = false

[load.compression]
enabled = true
filename = "sismos.zip"

[load.filenames]
series_chart = "Sismos_Semanas_Santas.png"

[monitoring]
enabled = true
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.log_format(), LogFormat::Automatic);
        assert!(config.strict_parsing());
        assert!(config.includes(ReportKind::Daily));
        assert_eq!(config.series_years(), 2015..=2020);
        assert_eq!(config.archive_name(), Some("sismos.zip"));
        assert_eq!(
            config.chart_filename(ChartKind::HolyWeekSeries),
            "Sismos_Semanas_Santas.png"
        );
        assert_eq!(
            config.chart_filename(ChartKind::DailyEvents),
            "events_per_day.png"
        );
        assert!(!config.render_charts());
        assert!(config.monitoring_enabled());
        let range = config.daily_range().unwrap();
        assert_eq!(range.len_days(), 761);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SISMO_TEST_EVENT_LOG", "/data/catalog.cat");

        let toml_content = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[source]
path = "${SISMO_TEST_EVENT_LOG}"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.path, "/data/catalog.cat");

        std::env::remove_var("SISMO_TEST_EVENT_LOG");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = BASIC.replace(
            "[load]",
            "[holy_week]\nseries_years = [2024, 2010]\n\n[load]",
        );
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = BASIC.replace("[load]", "[daily]\nstart = \"2022-01-01\"\n\n[load]");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let toml_content = BASIC.replace(
            "path = \"generalseismicity.event.cat\"",
            "path = \"x\"\nformat = \"xml\"",
        );
        assert!(matches!(
            TomlConfig::from_toml_str(&toml_content),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "semana-santa");
    }
}
