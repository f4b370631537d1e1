use anyhow::Context;
use clap::Parser;
use sismo_etl::core::ConfigProvider;
use sismo_etl::domain::model::ChartKind;
use sismo_etl::domain::services::holy_week_windows;
use sismo_etl::utils::error::ErrorSeverity;
use sismo_etl::utils::{logger, validation::Validate};
use sismo_etl::{
    DailyEventsPipeline, EtlEngine, EtlError, HolyWeekPipeline, LocalStorage, ReportKind,
    TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml_etl")]
#[command(about = "Seismic event statistics driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sismo-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show the holy week windows without reading the event log
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // 配置中的 log_level 也可開啟詳細輸出
    let verbose = args.verbose
        || config
            .monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .is_some_and(|level| matches!(level, "debug" | "trace"));
    logger::init_cli_logger(verbose);

    tracing::info!("🚀 Starting TOML-based seismic ETL");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return perform_dry_run(&config);
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut outputs = Vec::new();

    if config.includes(ReportKind::HolyWeek) {
        let source = LocalStorage::new(".".to_string());
        let sink = LocalStorage::new(config.output_path().to_string());
        let pipeline = HolyWeekPipeline::new(source, sink, config.clone());
        match EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run().await {
            Ok(path) => outputs.push(path),
            Err(e) => fail(e),
        }
    }

    if config.includes(ReportKind::Daily) {
        let source = LocalStorage::new(".".to_string());
        let sink = LocalStorage::new(config.output_path().to_string());
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
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!(
        "  Source: {} ({})",
        config.input_path(),
        config.log_format()
    );
    println!("  Strict parsing: {}", config.strict_parsing());
    println!("  Output: {}", config.output_path());
    println!(
        "  Reports: {}",
        config
            .reports
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Charts: {}", config.render_charts());

    if let Some(name) = config.archive_name() {
        println!("  Archive: {}", name);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    if config.includes(ReportKind::HolyWeek) {
        let series = config.series_years();
        let comparison = config.comparison_years();
        println!("⛪ Holy Week Windows:");
        println!(
            "  Series: {}-{}, Comparison: {}-{}",
            series.start(),
            series.end(),
            comparison.start(),
            comparison.end()
        );

        let first = *series.start().min(comparison.start());
        let last = *series.end().max(comparison.end());
        for year in (first..=last).filter(|y| series.contains(y) || comparison.contains(y)) {
            let windows = holy_week_windows(year)
                .with_context(|| format!("Cannot compute windows for {}", year))?;
            println!(
                "  {} Easter {} | before {} | holy week {} | after {}",
                year, windows.anchor, windows.week_before, windows.holy_week, windows.week_after
            );
        }
    }

    if config.includes(ReportKind::Daily) {
        println!();
        println!("📅 Daily Events:");
        match config.daily_range() {
            Some(range) => println!("  Range: {} ({} days)", range, range.len_days()),
            None => println!("  Range: every day between the first and last event"),
        }
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    if config.render_charts() {
        if config.includes(ReportKind::HolyWeek) {
            println!(
                "  Series chart: {}",
                config.chart_filename(ChartKind::HolyWeekSeries)
            );
            println!(
                "  Comparison chart: {}",
                config.chart_filename(ChartKind::HolyWeekComparison)
            );
        }
        if config.includes(ReportKind::Daily) {
            println!(
                "  Daily chart: {}",
                config.chart_filename(ChartKind::DailyEvents)
            );
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
