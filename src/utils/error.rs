use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareError {
    #[error("Storage error at {path}: {source}")]
    StorageError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Logger setup failed: {message}")]
    LoggerError { message: String },

    #[error("Invalid input. Usage: {usage}")]
    UsageError { usage: String },

    #[error("Empty command")]
    EmptyCommand,

    #[error("Invalid command: {name}")]
    UnknownCommand { name: String },

    #[error("Pet not found: {name}")]
    PetNotFound { name: String },

    #[error("A pet named \"{name}\" already exists.")]
    DuplicatePet { name: String },

    #[error("{pet} already has \"{treatment}\" on {date}.")]
    DuplicateTreatment {
        pet: String,
        treatment: String,
        date: NaiveDate,
    },

    #[error("No treatment at index {index} for {pet}.")]
    InvalidIndex { pet: String, index: usize },

    #[error("Invalid date '{value}'. Please use yyyy-MM-dd format (e.g., 2024-12-25).")]
    InvalidDate { value: String },

    #[error("{field} must be a valid number, got '{value}'.")]
    InvalidNumber { field: String, value: String },

    #[error("{field} {reason}.")]
    InvalidField { field: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Configuration,
    Input,
    Domain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CareError {
    pub fn usage(usage: impl Into<String>) -> Self {
        CareError::UsageError {
            usage: usage.into(),
        }
    }

    pub fn storage(path: impl Into<String>, source: std::io::Error) -> Self {
        CareError::StorageError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CareError::StorageError { .. } => ErrorCategory::Storage,
            CareError::ConfigValidationError { .. }
            | CareError::InvalidConfigValueError { .. }
            | CareError::LoggerError { .. } => ErrorCategory::Configuration,
            CareError::UsageError { .. }
            | CareError::EmptyCommand
            | CareError::UnknownCommand { .. }
            | CareError::InvalidDate { .. }
            | CareError::InvalidNumber { .. }
            | CareError::InvalidField { .. } => ErrorCategory::Input,
            CareError::PetNotFound { .. }
            | CareError::DuplicatePet { .. }
            | CareError::DuplicateTreatment { .. }
            | CareError::InvalidIndex { .. } => ErrorCategory::Domain,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Domain => ErrorSeverity::Low,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    /// Message shown at the prompt. Input and domain errors already read as
    /// sentences, the rest get a short prefix.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Domain => self.to_string(),
            ErrorCategory::Storage => format!("Storage problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CareError::StorageError { .. } => {
                "Check that the data directory exists and is writable"
            }
            CareError::ConfigValidationError { .. } | CareError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or remove the offending key to use the default"
            }
            CareError::LoggerError { .. } => "Check that the log directory is writable",
            CareError::UnknownCommand { .. } | CareError::EmptyCommand => {
                "Type 'help' to see the available commands"
            }
            CareError::PetNotFound { .. } => "Use 'list-pets' to see registered pets",
            CareError::InvalidIndex { .. } => "Use 'list-treatments n/PET_NAME' to see indices",
            _ => "Check the command syntax with 'help COMMAND'",
        }
    }
}

pub type Result<T> = std::result::Result<T, CareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_low_severity() {
        let err = CareError::PetNotFound {
            name: "milo".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Domain);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.user_friendly_message(), "Pet not found: milo");
    }

    #[test]
    fn test_storage_error_keeps_path_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CareError::storage("data/cuddlecare.txt", io);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("data/cuddlecare.txt"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.user_friendly_message().starts_with("Storage problem"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = CareError::InvalidConfigValueError {
            field: "logging.level".to_string(),
            value: "loud".to_string(),
            reason: "unknown level".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("configuration"));
    }
}
