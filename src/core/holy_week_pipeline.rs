use crate::adapters::chart;
use crate::core::export::{self, OutputFile};
use crate::core::extract::extract_events;
use crate::core::{ConfigProvider, EventRecord, Pipeline, Storage};
use crate::domain::model::{ChartKind, HolyWeekReport};
use crate::domain::services::{during_counts_for_years, holy_week_windows, window_counts_for_years};
use crate::utils::error::Result;

pub const SERIES_CSV: &str = "holy_week_series.csv";
pub const COMPARISON_CSV: &str = "holy_week_comparison.csv";
pub const REPORT_JSON: &str = "holy_week_report.json";

/// Holy week seismicity: per-year during-counts and before/during/after
/// comparison.
pub struct HolyWeekPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> HolyWeekPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    async fn render_charts(
        &self,
        report: &HolyWeekReport,
        files: &mut Vec<OutputFile>,
    ) -> Result<()> {
        if let (Some(first), Some(last)) = (report.series.first(), report.series.last()) {
            let title = format!(
                "Conteo de Sismos Durante la Semana Santa ({}-{})",
                first.year, last.year
            );
            let series = report.series.clone();
            let png =
                chart::render_png(move |path| chart::render_year_series(&series, &title, path))
                    .await?;
            files.push(OutputFile::new(
                self.config.chart_filename(ChartKind::HolyWeekSeries),
                png,
            ));
        } else {
            tracing::warn!("Empty holy week series, skipping chart");
        }

        if let (Some(first), Some(last)) = (report.comparison.first(), report.comparison.last()) {
            let title = format!(
                "Cantidad de sismos una semana antes, durante y una semana después de Semana Santa ({}-{})",
                first.year, last.year
            );
            let comparison = report.comparison.clone();
            let png = chart::render_png(move |path| {
                chart::render_window_comparison(&comparison, &title, path)
            })
            .await?;
            files.push(OutputFile::new(
                self.config.chart_filename(ChartKind::HolyWeekComparison),
                png,
            ));
        } else {
            tracing::warn!("Empty holy week comparison, skipping chart");
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for HolyWeekPipeline<S, C> {
    type Output = HolyWeekReport;

    async fn extract(&self) -> Result<Vec<EventRecord>> {
        extract_events(&self.source, &self.config).await
    }

    async fn transform(&self, events: Vec<EventRecord>) -> Result<HolyWeekReport> {
        let series_years = self.config.series_years();
        let comparison_years = self.config.comparison_years();

        let series = during_counts_for_years(series_years.clone(), &events)?;
        let comparison = window_counts_for_years(comparison_years.clone(), &events)?;

        // 兩個年份區間的聯集, 依年份排序
        let first = *series_years.start().min(comparison_years.start());
        let last = *series_years.end().max(comparison_years.end());
        let windows = (first..=last)
            .filter(|y| series_years.contains(y) || comparison_years.contains(y))
            .map(holy_week_windows)
            .collect::<Result<Vec<_>>>()?;

        Ok(HolyWeekReport {
            series,
            comparison,
            windows,
        })
    }

    async fn load(&self, report: HolyWeekReport) -> Result<String> {
        let mut files = vec![
            OutputFile::new(SERIES_CSV, export::to_csv(&report.series)?),
            OutputFile::new(COMPARISON_CSV, export::to_csv(&report.comparison)?),
            OutputFile::new(REPORT_JSON, serde_json::to_vec_pretty(&report)?),
        ];

        if self.config.render_charts() {
            self.render_charts(&report, &mut files).await?;
        }

        let archive = self
            .config
            .archive_name()
            .map(|name| format!("holy_week_{}", name));
        export::write_outputs(&self.sink, self.config.output_path(), &files, archive).await
    }
}
