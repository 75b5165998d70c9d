pub mod aggregate;
pub mod cleaning;
pub mod distribution;
pub mod etl;
pub mod ingest;
pub mod report;

pub use crate::domain::model::{CleanedDataset, DashboardReport, Dataset};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
