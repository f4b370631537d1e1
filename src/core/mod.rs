pub mod daily_pipeline;
pub mod etl;
pub mod export;
pub mod extract;
pub mod holy_week_pipeline;

pub use crate::domain::model::{EventRecord, Report};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
