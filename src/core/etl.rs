use crate::core::{Pipeline, Report};
use crate::utils::error::Result;
use crate::utils::monitor::{Phase, SystemMonitor};

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting ETL process...");

        // Extract
        let events = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} events", events.len());
        self.monitor.record(Phase::Extract, events.len());

        // Transform
        let report = self.pipeline.transform(events).await?;
        let rows = report.row_count();
        tracing::info!("🔄 Aggregated {} report rows", rows);
        self.monitor.record(Phase::Transform, rows);

        // Load
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.record(Phase::Load, rows);
        self.monitor.finish();

        Ok(output_path)
    }
}
