use clap::Parser;
use sismo_etl::utils::error::ErrorSeverity;
use sismo_etl::utils::{logger, validation::Validate};
use sismo_etl::{
    CliConfig, DailyEventsPipeline, EtlEngine, EtlError, HolyWeekPipeline, LocalStorage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting sismo-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut outputs = Vec::new();

    if config.report.includes_holy_week() {
        tracing::info!(
            "⛪ Holy week report: series {}-{}, comparison {}-{}",
            config.series_start,
            config.series_end,
            config.comparison_start,
            config.comparison_end
        );
        let source = LocalStorage::new(".".to_string());
        let sink = LocalStorage::new(config.output_path.clone());
        let pipeline = HolyWeekPipeline::new(source, sink, config.clone());
        match EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run().await {
            Ok(path) => outputs.push(path),
            Err(e) => fail(e),
        }
    }

    if config.report.includes_daily() {
        tracing::info!("📅 Daily events report");
        let source = LocalStorage::new(".".to_string());
        let sink = LocalStorage::new(config.output_path.clone());
        let pipeline = DailyEventsPipeline::new(source, sink, config.clone());
        match EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run().await {
            Ok(path) => outputs.push(path),
            Err(e) => fail(e),
        }
    }

    tracing::info!("✅ ETL process completed successfully!");
    println!("✅ ETL process completed successfully!");
    for path in outputs {
        println!("📁 Output saved to: {}", path);
    }

    Ok(())
}

fn fail(e: EtlError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // 輸出部分失敗
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3, // 系統錯誤
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
