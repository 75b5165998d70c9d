pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, RunConfig};

pub use crate::app::pipelines::DashboardPipeline;
pub use crate::core::etl::{DashboardEngine, RunOutcome};
pub use crate::domain::model::{AnalysisSettings, DashboardReport, RowPolicy};
pub use crate::utils::error::{InsightsError, Result};
