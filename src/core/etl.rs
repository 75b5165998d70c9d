use crate::core::{DashboardReport, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

/// Result of one pass: the report plus where the load stage put it.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: DashboardReport,
    pub output_path: String,
}

pub struct DashboardEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> DashboardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let started = Instant::now();
        tracing::info!("Starting analysis run");

        tracing::debug!("Reading upload...");
        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "Parsed {} rows with {} columns",
            dataset.len(),
            dataset.columns().len()
        );

        tracing::debug!("Computing dashboard sections...");
        let report = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Computed report over {} rows ({} dropped)",
            report.total_rows - report.dropped_rows,
            report.dropped_rows
        );

        tracing::debug!("Writing outputs...");
        let output_path = self.pipeline.load(&report).await?;
        tracing::info!(
            "Outputs written to {} in {:?}",
            output_path,
            started.elapsed()
        );

        Ok(RunOutcome {
            report,
            output_path,
        })
    }
}
