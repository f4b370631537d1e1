use crate::domain::model::{
    CalendarYear, ChartKind, EventRecord, LogFormat, Report, TimeWindow,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::ops::RangeInclusive;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn log_format(&self) -> LogFormat;
    fn strict_parsing(&self) -> bool;
    fn render_charts(&self) -> bool;
    /// ZIP bundle file name, when the outputs should be archived.
    fn archive_name(&self) -> Option<&str>;
    fn series_years(&self) -> RangeInclusive<CalendarYear>;
    fn comparison_years(&self) -> RangeInclusive<CalendarYear>;
    fn daily_range(&self) -> Option<TimeWindow>;
    /// Dates shown on the daily chart; `None` uses the span of the counts.
    fn daily_chart_window(&self) -> Option<TimeWindow>;

    fn chart_filename(&self, kind: ChartKind) -> String {
        kind.default_filename().to_string()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Output: Report;

    async fn extract(&self) -> Result<Vec<EventRecord>>;
    async fn transform(&self, events: Vec<EventRecord>) -> Result<Self::Output>;
    async fn load(&self, report: Self::Output) -> Result<String>;
}
