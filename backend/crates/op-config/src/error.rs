use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{category} error: {message} {location}")]
    Generic {
        category: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid value {value:?} for {var}: {reason} {location}")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
        location: ErrorLocation,
    },
}

impl ConfigError {
    /// Create a server error
    #[track_caller]
    pub fn server<S: Into<String>>(message: S) -> Self {
        ConfigError::Generic {
            category: "Server",
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a token manager error
    #[track_caller]
    pub fn token_manager<S: Into<String>>(message: S) -> Self {
        ConfigError::Generic {
            category: "Token manager",
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create an error for an environment variable that failed to parse
    #[track_caller]
    pub fn invalid_env<R: std::fmt::Display>(var: &str, value: &str, reason: R) -> Self {
        ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
