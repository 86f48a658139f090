use crate::domain::model::ListSide;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("File '{file}' is not valid JSON: {source}")]
    InvalidJson {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("File '{file}' is not a .json export")]
    UnsupportedFileType { file: String },

    #[error("No record collection found in '{file}'")]
    NoRecordCollectionFound { file: String },

    #[error("No usernames could be extracted from {records} records in '{file}'")]
    NoIdentifiersExtracted { file: String, records: usize },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("The {missing} list is empty; both exports are required before analysis")]
    IncompleteInput { missing: ListSide },

    #[error("No saved session at '{path}'")]
    StateNotFound { path: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Usage,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnalyzerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidJson { .. } | Self::UnsupportedFileType { .. } => ErrorCategory::Input,
            Self::NoRecordCollectionFound { .. }
            | Self::NoIdentifiersExtracted { .. }
            | Self::IncompleteInput { .. }
            | Self::StateNotFound { .. } => ErrorCategory::Data,
            Self::InvalidInput { .. } => ErrorCategory::Usage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
            Self::ZipError(_)
            | Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Usage | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType { .. } => {
                "Pass the followers/following files from the export as .json files"
            }
            Self::InvalidJson { .. } => {
                "Re-download the export in JSON format; the file appears truncated or edited"
            }
            Self::NoRecordCollectionFound { .. } | Self::NoIdentifiersExtracted { .. } => {
                "Check that the file is a followers or following export, not another part of the archive"
            }
            Self::IncompleteInput { .. } => "Provide both --followers and --following exports",
            Self::StateNotFound { .. } => {
                "Run an analysis with both export files first, or drop --from-state"
            }
            Self::InvalidInput { .. } => "This is a bug in the caller; report it with the input used",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration value and run again",
            Self::IoError(_) => "Check that the paths exist and are readable/writable",
            Self::ZipError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                "Retry; if it persists, disable compression or pick a different output format"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NoRecordCollectionFound { file } | Self::NoIdentifiersExtracted { file, .. } => {
                format!("No usernames found in '{}'. Check the file format.", file)
            }
            Self::InvalidJson { file, .. } => format!("'{}' is not a valid JSON file.", file),
            Self::UnsupportedFileType { file } => {
                format!("'{}' is not a JSON file; only .json exports are accepted.", file)
            }
            Self::IncompleteInput { .. } => "Load both export files first.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
