use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Missing required column: {column}")]
    MissingColumnError { column: String },

    #[error("Cannot convert '{value}' in column '{column}' (row index {row}) to a number")]
    CleaningError {
        row: usize,
        column: String,
        value: String,
    },

    #[error("No values available for '{column}'")]
    EmptyDatasetError { column: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InsightsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InsightsError::ParseError { .. }
            | InsightsError::MissingColumnError { .. } => ErrorCategory::Input,
            InsightsError::CleaningError { .. } | InsightsError::EmptyDatasetError { .. } => {
                ErrorCategory::Data
            }
            InsightsError::ConfigError { .. }
            | InsightsError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            InsightsError::CsvError(_)
            | InsightsError::IoError(_)
            | InsightsError::SerializationError(_)
            | InsightsError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            InsightsError::ParseError { message } => {
                format!("The uploaded file is not valid CSV: {}", message)
            }
            InsightsError::CsvError(e) => format!("Could not write the chart data as CSV: {}", e),
            InsightsError::MissingColumnError { column } => {
                format!("The uploaded file has no '{}' column", column)
            }
            InsightsError::CleaningError { row, column, value } => format!(
                "Data row {} has a '{}' value that is not a number: '{}'",
                row + 1,
                column,
                value
            ),
            InsightsError::EmptyDatasetError { column } => {
                format!("There is no data to summarise for '{}'", column)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            InsightsError::ParseError { .. } => {
                "Check that every row has the same number of fields as the header"
            }
            InsightsError::MissingColumnError { .. } => {
                "The file needs the columns name, networth, country, industry and age"
            }
            InsightsError::CleaningError { .. } => {
                "Fix the value in the file, or rerun with --drop-invalid-rows"
            }
            InsightsError::EmptyDatasetError { .. } => "Provide a file with at least one data row",
            InsightsError::ConfigError { .. } | InsightsError::InvalidConfigValueError { .. } => {
                "Review the command line flags and the TOML configuration file"
            }
            InsightsError::IoError(_) => "Check that the paths exist and are writable",
            InsightsError::CsvError(_)
            | InsightsError::SerializationError(_)
            | InsightsError::ZipError(_) => {
                "Retry the run; if it keeps failing, report the problem"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
