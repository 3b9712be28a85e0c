use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Chart rendering failed for {chart}: {source}")]
    ChartError {
        chart: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Dataset is missing required column '{column}'")]
    MissingColumnError { column: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Rendering,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::ConfigValidationError { .. }
            | AnalysisError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AnalysisError::CsvError(_)
            | AnalysisError::SpreadsheetError(_)
            | AnalysisError::MissingColumnError { .. } => ErrorCategory::Input,
            AnalysisError::ProcessingError { .. } => ErrorCategory::Processing,
            AnalysisError::ChartError { .. } => ErrorCategory::Rendering,
            AnalysisError::ZipError(_)
            | AnalysisError::IoError(_)
            | AnalysisError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Rendering => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input | ErrorCategory::Processing => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Process exit status for a failed run, keyed on severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AnalysisError::MissingColumnError { column } => format!(
                "Check that the header row of the sheet contains a '{}' column",
                column
            ),
            AnalysisError::SpreadsheetError(_) => {
                "Check the dataset path and that the sheet name matches exactly".to_string()
            }
            AnalysisError::CsvError(_) => {
                "Make sure the CSV export is comma-separated with a header row".to_string()
            }
            AnalysisError::InvalidConfigValueError { field, .. }
            | AnalysisError::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
            AnalysisError::ChartError { .. } => {
                "Re-run with --verbose to see which values broke the chart".to_string()
            }
            AnalysisError::IoError(_) | AnalysisError::ZipError(_) => {
                "Check that the output directory is writable and has free space".to_string()
            }
            AnalysisError::SerializationError(_) => {
                "Report this as a bug together with the dataset".to_string()
            }
            AnalysisError::ProcessingError { .. } => {
                "Inspect the dataset for unexpected values".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("Could not read the dataset: {}", self),
            ErrorCategory::Processing => format!("Analysis failed: {}", self),
            ErrorCategory::Rendering => format!("Could not draw a chart: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
