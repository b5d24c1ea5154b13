use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;

/// Exit status for readiness failures
pub const EXIT_NOT_READY: u8 = 1;
/// Exit status for configuration and launch failures
pub const EXIT_STARTUP: u8 = 2;
/// Exit status when the server image could not be executed
pub const EXIT_HANDOFF: u8 = 126;
/// Exit status when the server program was not found
pub const EXIT_HANDOFF_NOT_FOUND: u8 = 127;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Configuration invalid: {source}")]
    Config {
        #[from]
        source: op_config::ConfigError,
    },

    #[error("Failed to launch token manager `{command}`: {source} {location}")]
    ProcessLaunch {
        command: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Token store not initialised: token manager not ready within {timeout_secs}s {location}")]
    NotReady {
        timeout_secs: f64,
        location: ErrorLocation,
    },

    #[error("Token manager readiness check failed: {reason} {location}")]
    ReadinessFailed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Failed to exec `{program}`: {source} {location}")]
    Handoff {
        program: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Supervisor runtime error: {message} {location}")]
    Runtime {
        message: String,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub fn launch(command: &str, source: std::io::Error) -> Self {
        Self::ProcessLaunch {
            command: command.to_string(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_ready(timeout: Duration) -> Self {
        Self::NotReady {
            timeout_secs: timeout.as_secs_f64(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn readiness_failed<S: Into<String>>(reason: S) -> Self {
        Self::ReadinessFailed {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn runtime<S: Into<String>>(message: S) -> Self {
        Self::Runtime {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Process exit status reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NotReady { .. } | Self::ReadinessFailed { .. } => EXIT_NOT_READY,
            Self::Handoff { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                EXIT_HANDOFF_NOT_FOUND
            }
            Self::Handoff { .. } => EXIT_HANDOFF,
            Self::Config { .. } | Self::ProcessLaunch { .. } | Self::Runtime { .. } => {
                EXIT_STARTUP
            }
        }
    }

    /// Whether the prerequisite process failed to become ready
    pub fn is_readiness_failure(&self) -> bool {
        matches!(self, Self::NotReady { .. } | Self::ReadinessFailed { .. })
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::Config { .. } => "Check the supervisor environment variables.",
            Self::ProcessLaunch { .. } => {
                "The token manager command could not be started. \
                   Check TOKEN_MANAGER_CMD and that its interpreter is installed."
            }
            Self::NotReady { .. } => {
                "The token manager never wrote tokens to the token store. \
                   Check its logs and upstream credentials, or raise TOKEN_WAIT_TIMEOUT."
            }
            Self::ReadinessFailed { .. } => {
                "The readiness check itself failed. \
                   Check OPEN115_TOKEN_DB permissions or READINESS_CMD."
            }
            Self::Handoff { .. } => "Check SERVER_PROGRAM is installed and on PATH.",
            Self::Runtime { .. } => "An unexpected error occurred. Please check the logs.",
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
