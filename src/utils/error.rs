use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Missing columns: {columns:?}")]
    MissingColumns { columns: Vec<String> },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::CsvError(_)
            | EtlError::MissingColumns { .. }
            | EtlError::ProcessingError { .. } => ErrorSeverity::High,
            EtlError::IoError(_)
            | EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity to the routing endpoint and retry".to_string()
            }
            EtlError::CsvError(_) => {
                "Make sure the input is a valid CSV export of the shipment sheet".to_string()
            }
            EtlError::IoError(_) => "Check that the input file exists and the output directory is writable".to_string(),
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the command line arguments or the TOML configuration file".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            EtlError::MissingColumns { columns } => {
                format!("Add the missing columns to the sheet header: {}", columns.join(", "))
            }
            EtlError::ProcessingError { .. } => "Inspect the input rows for unexpected content".to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_every_column() {
        let err = EtlError::MissingColumns {
            columns: vec!["Origin Zip".to_string(), "Destination Zip".to_string()],
        };
        assert!(err.to_string().contains("Origin Zip"));
        assert!(err.recovery_suggestion().contains("Destination Zip"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = EtlError::MissingConfigError {
            field: "input".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
