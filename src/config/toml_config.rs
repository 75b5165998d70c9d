use crate::domain::model::AnalysisSettings;
use crate::utils::error::{InsightsError, Result};
use crate::utils::validation::{
    validate_allowed_values, validate_non_empty_string, validate_number_range, validate_path,
    validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 3] = ["text", "json", "csv"];
pub const MAX_PREVIEW_ROWS: usize = 1_000;
pub const MAX_HISTOGRAM_BINS: usize = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub analysis: AnalysisSettings,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub archive_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            output_formats: vec!["text".to_string()],
            archive_name: "dashboard_bundle.zip".to_string(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InsightsError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InsightsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            InsightsError::ConfigError {
                message: format!("Invalid substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

pub fn validate_analysis(settings: &AnalysisSettings) -> Result<()> {
    validate_number_range("analysis.preview_rows", settings.preview_rows, 1, MAX_PREVIEW_ROWS)?;
    validate_positive_number("analysis.top_n", settings.top_n, 1)?;
    validate_positive_number("analysis.category_limit", settings.category_limit, 1)?;
    validate_number_range(
        "analysis.histogram_bins",
        settings.histogram_bins,
        1,
        MAX_HISTOGRAM_BINS,
    )?;
    if settings.currency_markers.is_empty() {
        return Err(InsightsError::InvalidConfigValueError {
            field: "analysis.currency_markers".to_string(),
            value: "[]".to_string(),
            reason: "At least one marker character is required".to_string(),
        });
    }
    if let Some(digit) = settings
        .currency_markers
        .iter()
        .find(|c| c.is_ascii_digit() || **c == '.')
    {
        return Err(InsightsError::InvalidConfigValueError {
            field: "analysis.currency_markers".to_string(),
            value: digit.to_string(),
            reason: "Markers cannot strip digits or the decimal point".to_string(),
        });
    }
    Ok(())
}

pub fn validate_output(output: &OutputConfig) -> Result<()> {
    validate_path("output.output_path", &output.output_path)?;
    validate_allowed_values("output.output_formats", &output.output_formats, &OUTPUT_FORMATS)?;
    validate_non_empty_string("output.archive_name", &output.archive_name)?;
    Ok(())
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_analysis(&self.analysis)?;
        validate_output(&self.output)
    }
}
