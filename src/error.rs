//! Error types and handling for the Sahayta application
//!
//! Lookup failures never show up here: the adapters collapse them into
//! [`crate::models::Lookup::NotFound`]. These variants cover the ambient
//! failures around them (configuration, invalid input, client setup, I/O).

use thiserror::Error;

/// Main error type for the Sahayta application
#[derive(Error, Debug)]
pub enum SahaytaError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// HTTP client construction errors
    #[error("HTTP client error: {source}")]
    Client {
        #[from]
        source: reqwest::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SahaytaError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SahaytaError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file and API keys.")
            }
            SahaytaError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SahaytaError::Client { .. } => {
                "Unable to set up the connection to external services.".to_string()
            }
            SahaytaError::Io { .. } => {
                "I/O operation failed. Please check the address and permissions.".to_string()
            }
        }
    }

    /// Process exit code used by the CLI for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            SahaytaError::Config { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = SahaytaError::config("missing API key");
        assert!(matches!(config_err, SahaytaError::Config { .. }));

        let validation_err = SahaytaError::validation("invalid coordinates");
        assert!(matches!(validation_err, SahaytaError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = SahaytaError::config("weather.api_key is not set");
        assert!(config_err.user_message().contains("weather.api_key is not set"));
        assert!(config_err.user_message().contains("API keys"));

        let validation_err = SahaytaError::validation("latitude 91");
        assert!(validation_err.user_message().contains("latitude 91"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: SahaytaError = io_err.into();
        assert!(matches!(err, SahaytaError::Io { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_exit_code() {
        assert_eq!(SahaytaError::config("x").exit_code(), 2);
    }
}
