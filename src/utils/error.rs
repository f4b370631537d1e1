use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Invalid year {year}: supported years are {min}..={max}")]
    InvalidYear { year: i32, min: i32, max: i32 },

    #[error("Malformed event record at line {line}: {reason}")]
    MalformedEventRecord { line: u64, reason: String },

    #[error("Invalid date window: {start} is after {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Chart rendering failed: {0}")]
    ChartError(String),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
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
    Calendar,
    Output,
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

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MalformedEventRecord { .. } | EtlError::CsvError(_) => ErrorCategory::Input,
            EtlError::InvalidYear { .. } | EtlError::InvalidWindow { .. } => {
                ErrorCategory::Calendar
            }
            EtlError::ChartError(_)
            | EtlError::ZipError(_)
            | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::IoError(_) => ErrorCategory::System,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 輸出失敗通常可以重跑解決
            EtlError::ChartError(_) | EtlError::ZipError(_) => ErrorSeverity::Medium,
            EtlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::InvalidYear { min, max, .. } => {
                format!("Choose years between {} and {} (Gregorian calendar)", min, max)
            }
            EtlError::MalformedEventRecord { line, .. } => format!(
                "Fix or remove line {} of the event log, or run without --strict to skip it",
                line
            ),
            EtlError::InvalidWindow { .. } => {
                "Make sure the start date is on or before the end date".to_string()
            }
            EtlError::ChartError(_) => {
                "Check the output directory is writable, or disable charts".to_string()
            }
            EtlError::ZipError(_) => "Disable the archive output or free disk space".to_string(),
            EtlError::CsvError(_) => "Check the event log is plain text, one event per line".to_string(),
            EtlError::IoError(_) => "Check the file paths and permissions".to_string(),
            EtlError::SerializationError(_) => "Report this as a bug".to_string(),
            EtlError::ConfigValidationError { field, .. }
            | EtlError::InvalidConfigValueError { field, .. } => {
                format!("Review the '{}' setting", field)
            }
            EtlError::MissingConfigError { field } => format!("Add the '{}' setting", field),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the event log: {}", self),
            ErrorCategory::Calendar => format!("Date computation rejected: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("File system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
