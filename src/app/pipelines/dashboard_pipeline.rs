use crate::app::render::{build_csv_bundle, render_json, render_text};
use crate::core::ingest::parse;
use crate::core::report::build_report;
use crate::core::{ConfigProvider, DashboardReport, Dataset, Pipeline, Storage};
use crate::utils::error::Result;

pub const TEXT_REPORT_FILE: &str = "report.txt";
pub const JSON_REPORT_FILE: &str = "report.json";

pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        tracing::debug!("Reading upload from: {}", self.config.input_path());
        let raw = self.storage.read_file(self.config.input_path()).await?;
        tracing::debug!("Upload is {} bytes", raw.len());
        parse(&raw)
    }

    async fn transform(&self, data: Dataset) -> Result<DashboardReport> {
        build_report(data, self.config.analysis())
    }

    async fn load(&self, report: &DashboardReport) -> Result<String> {
        if self.wants("text") {
            self.storage
                .write_file(TEXT_REPORT_FILE, render_text(report).as_bytes())
                .await?;
            tracing::debug!("Wrote {}", TEXT_REPORT_FILE);
        }

        if self.wants("json") {
            self.storage
                .write_file(JSON_REPORT_FILE, render_json(report)?.as_bytes())
                .await?;
            tracing::debug!("Wrote {}", JSON_REPORT_FILE);
        }

        if self.wants("csv") {
            let bundle = build_csv_bundle(report)?;
            tracing::debug!("Writing chart bundle ({} bytes)", bundle.len());
            self.storage
                .write_file(self.config.archive_name(), &bundle)
                .await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
