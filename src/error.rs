//! Error types for the reimbursement engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while validating trips, loading
//! configuration, and running calibration reports.

use thiserror::Error;

/// The main error type for the reimbursement engine.
///
/// The calculation path itself only ever produces [`EngineError::InvalidInput`];
/// the remaining variants come from configuration loading and the offline
/// calibration tooling.
///
/// # Example
///
/// ```
/// use travel_reimbursement::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "days".to_string(),
///     message: "must be at least 1".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'days': must be at least 1");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A trip attribute was non-numeric or out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The trip attribute that was rejected.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// Configuration or case file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration or case file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but describes an unusable rule table.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the inconsistency.
        message: String,
    },

    /// An offline calibration routine could not produce a result.
    #[error("Calibration error: {message}")]
    CalibrationError {
        /// A description of the calibration failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`] on `field`.
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::InvalidInput {
            field: "miles".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid input 'miles': must not be negative"
        );
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/legacy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/legacy.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_message() {
        let error = EngineError::invalid_config("mileage bands must not be empty");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: mileage bands must not be empty"
        );
    }

    #[test]
    fn test_calibration_error_displays_message() {
        let error = EngineError::CalibrationError {
            message: "normal equations are singular".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Calibration error: normal equations are singular"
        );
    }

    #[test]
    fn test_invalid_input_shorthand() {
        match EngineError::invalid_input("receipts", "not a number") {
            EngineError::InvalidInput { field, message } => {
                assert_eq!(field, "receipts");
                assert_eq!(message, "not a number");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_input() -> EngineResult<()> {
            Err(EngineError::invalid_input("days", "must be at least 1"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_input()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
