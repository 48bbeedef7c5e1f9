use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolarError {
    #[error("Invalid input for {field} ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown region: {key}")]
    UnknownRegion { key: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Mail delivery failed: {message}")]
    DeliveryError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SolarError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: &str) -> Self {
        SolarError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SolarError::InvalidInput { .. }
            | SolarError::UnknownRegion { .. }
            | SolarError::ValidationError { .. } => ErrorCategory::Input,
            SolarError::ConfigError { .. }
            | SolarError::ConfigValidationError { .. }
            | SolarError::InvalidConfigValueError { .. }
            | SolarError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SolarError::IoError(_)
            | SolarError::SerializationError(_)
            | SolarError::CsvError(_) => ErrorCategory::Io,
            SolarError::DeliveryError { .. } => ErrorCategory::Delivery,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            SolarError::InvalidInput { field, reason, .. } => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            SolarError::UnknownRegion { key } => {
                format!("Region '{}' is not supported", key)
            }
            SolarError::ConfigError { message } => format!("Configuration problem: {}", message),
            SolarError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            SolarError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            SolarError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            SolarError::ValidationError { message } => message.clone(),
            SolarError::DeliveryError { .. } => "The message could not be delivered".to_string(),
            SolarError::IoError(e) => format!("File system error: {}", e),
            SolarError::SerializationError(e) => format!("Could not encode or decode JSON: {}", e),
            SolarError::CsvError(e) => format!("Could not write CSV: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SolarError::InvalidInput { .. } => "Use a panel count of at least 1",
            SolarError::UnknownRegion { .. } => {
                "Run the `regions` command to list the supported regions"
            }
            SolarError::ConfigError { .. }
            | SolarError::ConfigValidationError { .. }
            | SolarError::InvalidConfigValueError { .. }
            | SolarError::MissingConfigError { .. } => {
                "Check the TOML configuration file against the documented format"
            }
            SolarError::ValidationError { .. } => "Fill in every required field",
            SolarError::DeliveryError { .. } => "Try again later or contact us by phone",
            SolarError::IoError(_) => "Check that the path exists and is writable",
            SolarError::SerializationError(_) => "Make sure the payload is valid JSON",
            SolarError::CsvError(_) => "Check that the output path is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, SolarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimator_errors_are_input_errors() {
        let err = SolarError::invalid_input("panel_count", 0, "must be positive");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = SolarError::UnknownRegion {
            key: "unknown".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.user_friendly_message().contains("unknown"));
    }

    #[test]
    fn test_delivery_error_hides_provider_details() {
        let err = SolarError::DeliveryError {
            message: "provider returned 503".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(!err.user_friendly_message().contains("503"));
    }
}
