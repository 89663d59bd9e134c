//! Error types for venue-admin

use std::{error::Error as StdError, fmt};

/// Main error type for venue-admin
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Backend-as-a-service or REST endpoint failure
    Backend(String),

    /// Spreadsheet could not be read or written
    Spreadsheet(String),

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Corporate seat allocation would be exceeded
    SeatLimitExceeded {
        /// Seats the batch needs
        requested: usize,
        /// Seats still free on the corporate
        available: usize,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a validation error on `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Backend(msg) => write!(f, "Backend error: {msg}"),
            Self::Spreadsheet(msg) => write!(f, "Spreadsheet error: {msg}"),
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::SeatLimitExceeded {
                requested,
                available,
            } => write!(
                f,
                "Seat limit exceeded: {requested} requested, {available} available"
            ),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<validator::ValidationErrors> for Error {
    /// Reports the first failing field, alphabetically, so messages are stable
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, list)) => {
                let message = list.first().map_or_else(
                    || "is invalid".to_string(),
                    |error| {
                        error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string)
                    },
                );
                Self::validation(field.to_string(), message)
            }
            None => Self::validation("record", errors.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        assert!(matches!(app_error, Error::Io(_)));
        assert!(format!("{}", app_error).contains("I/O error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation("email", "Field is required");

        assert_eq!(
            format!("{}", error),
            "Validation error: email - Field is required"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct Form {
            #[validate(email)]
            email: String,
            #[validate(length(min = 1, message = "name is required"))]
            name: String,
        }

        let form = Form {
            email: "nope".to_string(),
            name: String::new(),
        };
        let error = Error::from(form.validate().unwrap_err());

        assert_eq!(
            format!("{}", error),
            "Validation error: email - email"
        );
    }

    #[test]
    fn test_seat_limit_error() {
        let error = Error::SeatLimitExceeded {
            requested: 12,
            available: 3,
        };

        assert_eq!(
            format!("{}", error),
            "Seat limit exceeded: 12 requested, 3 available"
        );
    }

    #[test]
    fn test_serialization_error_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let app_error = Error::from(json_error);

        assert!(format!("{}", app_error).starts_with("Serialization error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_all_error_display_variants() {
        let test_cases = vec![
            (
                Error::Configuration {
                    message: "missing url".to_string(),
                },
                "Configuration error: missing url",
            ),
            (
                Error::Backend("503 Service Unavailable".to_string()),
                "Backend error: 503 Service Unavailable",
            ),
            (
                Error::Spreadsheet("no worksheet".to_string()),
                "Spreadsheet error: no worksheet",
            ),
            (
                Error::NotFound {
                    resource: "restaurants/42".to_string(),
                },
                "Resource not found: restaurants/42",
            ),
            (Error::Other("other error".to_string()), "other error"),
        ];

        for (error, expected) in test_cases {
            assert_eq!(format!("{}", error), expected);
        }
    }
}
