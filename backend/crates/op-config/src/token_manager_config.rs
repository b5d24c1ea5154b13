use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_READY_TIMEOUT_SECS, DEFAULT_STOP_TIMEOUT_SECS,
    DEFAULT_TMP_DIR, DEFAULT_TOKEN_DB_FILENAME, DEFAULT_TOKEN_MANAGER_COMMAND,
};

use std::path::PathBuf;
use std::time::Duration;

/// Settings for the background token manager and the readiness gate.
#[derive(Debug, Clone)]
pub struct TokenManagerConfig {
    /// Command line of the background process, split with shell-word rules
    pub command: String,
    /// Budget handed to the readiness probe
    pub ready_timeout: Duration,
    /// Grace period between SIGTERM and SIGKILL during teardown
    pub stop_timeout: Duration,
    /// External readiness command; the token store is probed when unset
    pub readiness_command: Option<String>,
    /// SQLite file shared with the token manager
    pub token_db: PathBuf,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            command: String::from(DEFAULT_TOKEN_MANAGER_COMMAND),
            ready_timeout: Duration::from_secs(DEFAULT_READY_TIMEOUT_SECS),
            stop_timeout: Duration::from_secs(DEFAULT_STOP_TIMEOUT_SECS),
            readiness_command: None,
            token_db: PathBuf::from(DEFAULT_TMP_DIR).join(DEFAULT_TOKEN_DB_FILENAME),
        }
    }
}

impl TokenManagerConfig {
    /// Token store location when `OPEN115_TOKEN_DB` is not set.
    pub fn default_token_db(tmp_dir: Option<&str>) -> PathBuf {
        let base = tmp_dir
            .filter(|dir| !dir.is_empty())
            .unwrap_or(DEFAULT_TMP_DIR);
        PathBuf::from(base).join(DEFAULT_TOKEN_DB_FILENAME)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::token_manager("command must not be empty"));
        }

        if self.token_db.as_os_str().is_empty() {
            return Err(ConfigError::token_manager("token store path must not be empty"));
        }

        Ok(())
    }
}

/// Parse a duration given either as (fractional) seconds or in humantime
/// notation such as `90s` or `2m`.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let trimmed = value.trim();

    if let Ok(secs) = trimmed.parse::<f64>() {
        return Duration::try_from_secs_f64(secs)
            .map_err(|_| format!("{trimmed} is not a non-negative number of seconds"));
    }

    humantime::parse_duration(trimmed).map_err(|e| e.to_string())
}
