pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{toml_config::TomlConfig, ReportKind};

pub use core::{
    daily_pipeline::DailyEventsPipeline, etl::EtlEngine, holy_week_pipeline::HolyWeekPipeline,
};
pub use utils::error::{EtlError, Result};
