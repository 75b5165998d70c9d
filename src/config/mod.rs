pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{AnalysisSettings, RowPolicy};
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use toml_config::{validate_analysis, validate_output, OutputConfig, TomlConfig};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "billionaire-insights")]
#[command(about = "Summary statistics and breakdowns for the Forbes Billionaires CSV")]
pub struct CliConfig {
    /// CSV file to analyse
    #[arg(short, long)]
    pub input: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the reports are written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Output formats: text, json, csv
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    #[arg(long)]
    pub top_n: Option<usize>,

    #[arg(long)]
    pub category_limit: Option<usize>,

    /// Skip rows whose networth cannot be parsed instead of failing
    #[arg(long)]
    pub drop_invalid_rows: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Settings for one run: the upload plus file and flag configuration merged.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: String,
    pub output: OutputConfig,
    pub analysis: AnalysisSettings,
}

impl RunConfig {
    pub fn new(input_path: impl Into<String>, file: TomlConfig) -> Self {
        Self {
            input_path: input_path.into(),
            output: file.output,
            analysis: file.analysis,
        }
    }

    /// Loads `--config` when given, then applies flag overrides.
    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig, input_path: &str) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        let mut config = Self::new(input_path, file);
        if let Some(path) = &cli.output_path {
            config.output.output_path = path.clone();
        }
        if !cli.formats.is_empty() {
            config.output.output_formats = cli.formats.clone();
        }
        if let Some(top_n) = cli.top_n {
            config.analysis.top_n = top_n;
        }
        if let Some(limit) = cli.category_limit {
            config.analysis.category_limit = limit;
        }
        if cli.drop_invalid_rows {
            config.analysis.row_policy = RowPolicy::DropRow;
        }
        Ok(config)
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.output_formats
    }

    fn archive_name(&self) -> &str {
        &self.output.archive_name
    }

    fn analysis(&self) -> &AnalysisSettings {
        &self.analysis
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path)?;
        validate_file_extension("input", &self.input_path, &["csv"])?;
        validate_analysis(&self.analysis)?;
        validate_output(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_validates_upload_extension() {
        let config = RunConfig::new("forbes.csv", TomlConfig::default());
        assert!(config.validate().is_ok());

        let config = RunConfig::new("forbes.xlsx", TomlConfig::default());
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_flags_override_file_settings() {
        let cli = CliConfig::parse_from([
            "billionaire-insights",
            "--input",
            "forbes.csv",
            "--formats",
            "json,csv",
            "--top-n",
            "3",
            "--drop-invalid-rows",
            "--output-path",
            "/tmp/out",
        ]);
        let config = RunConfig::from_cli(&cli, "forbes.csv").unwrap();

        assert_eq!(config.output_formats(), &["json", "csv"]);
        assert_eq!(config.analysis().top_n, 3);
        assert_eq!(config.analysis().category_limit, 20);
        assert_eq!(config.analysis().row_policy, RowPolicy::DropRow);
        assert_eq!(config.output_path(), "/tmp/out");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_without_flags_defaults_apply() {
        let cli = CliConfig::parse_from(["billionaire-insights"]);
        assert!(cli.input.is_none());

        let config = RunConfig::from_cli(&cli, "forbes.csv").unwrap();
        assert_eq!(config.output_formats(), &["text"]);
        assert_eq!(config.analysis().row_policy, RowPolicy::FailWhole);
    }
}
