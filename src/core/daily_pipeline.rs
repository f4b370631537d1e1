use crate::adapters::chart;
use crate::core::export::{self, OutputFile};
use crate::core::extract::extract_events;
use crate::core::{ConfigProvider, EventRecord, Pipeline, Storage};
use crate::domain::model::{ChartKind, DailyReport, TimeWindow};
use crate::domain::services::count_events_per_day;
use crate::utils::error::Result;

pub const DAILY_CSV: &str = "events_per_day.csv";

/// Events per calendar day, optionally restricted to a date range.
pub struct DailyEventsPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DailyEventsPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DailyEventsPipeline<S, C> {
    type Output = DailyReport;

    async fn extract(&self) -> Result<Vec<EventRecord>> {
        extract_events(&self.source, &self.config).await
    }

    async fn transform(&self, events: Vec<EventRecord>) -> Result<DailyReport> {
        let range = self.config.daily_range();
        if let Some(window) = &range {
            tracing::debug!("Daily range: {}", window);
        }

        Ok(DailyReport {
            range,
            days: count_events_per_day(&events, range),
        })
    }

    async fn load(&self, report: DailyReport) -> Result<String> {
        let mut files = vec![OutputFile::new(DAILY_CSV, export::to_csv(&report.days)?)];

        if self.config.render_charts() {
            match (report.days.first(), report.days.last()) {
                (Some(first), Some(last)) => {
                    let window = self
                        .config
                        .daily_chart_window()
                        .unwrap_or_else(|| TimeWindow::new(first.date, last.date));
                    let title = format!(
                        "Number of automatic events per Day ({} to {})",
                        window.start, window.end
                    );
                    let days = report.days.clone();
                    let png = chart::render_png(move |path| {
                        chart::render_daily_counts(&days, window, &title, path)
                    })
                    .await?;
                    files.push(OutputFile::new(
                        self.config.chart_filename(ChartKind::DailyEvents),
                        png,
                    ));
                }
                _ => tracing::warn!("No events per day to plot, skipping chart"),
            }
        }

        let archive = self
            .config
            .archive_name()
            .map(|name| format!("daily_{}", name));
        export::write_outputs(&self.sink, self.config.output_path(), &files, archive).await
    }
}
