use crate::{
    ConfigError, ConfigErrorResult, LoggingConfig, ServerConfig, TokenManagerConfig,
    parse_duration,
};

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::info;

/// Runtime configuration of the supervisor.
///
/// Assembled once at startup and passed by reference to every component;
/// nothing downstream reads the environment again.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub token_manager: TokenManagerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config for a process start.
    ///
    /// Empty variables count as unset, so `PORT=` keeps the default port.
    ///
    /// Loading order:
    /// 1. Read `.env` from the working directory if present (does not
    ///    override variables that are already set)
    /// 2. Start from defaults
    /// 3. Apply environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Build config from defaults and the current environment only.
    pub fn from_env() -> ConfigErrorResult<Self> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.token_manager.validate()?;
        Ok(())
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {} {} on {}:{} (loop={}, http={}, workers={})",
            self.server.program,
            self.server.app_module,
            self.server.host,
            self.server.port,
            self.server.loop_impl,
            self.server.http_impl,
            self.server.workers
        );
        info!("  token_manager: {}", self.token_manager.command);
        info!(
            "  readiness: {} (timeout={}, stop grace={})",
            match self.token_manager.readiness_command {
                Some(ref cmd) => cmd.clone(),
                None => format!("token store {}", self.token_manager.token_db.display()),
            },
            humantime::format_duration(self.token_manager.ready_timeout),
            humantime::format_duration(self.token_manager.stop_timeout)
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) -> ConfigErrorResult<()> {
        // Server
        Self::apply_env_string("SERVER_PROGRAM", &mut self.server.program);
        Self::apply_env_string("APP_MODULE", &mut self.server.app_module);
        Self::apply_env_string("HOST", &mut self.server.host);
        Self::apply_env_parse("PORT", &mut self.server.port)?;
        Self::apply_env_string("UVICORN_LOOP", &mut self.server.loop_impl);
        Self::apply_env_string("UVICORN_HTTP", &mut self.server.http_impl);
        Self::apply_env_parse("UVICORN_WORKERS", &mut self.server.workers)?;

        // Token manager
        Self::apply_env_string("TOKEN_MANAGER_CMD", &mut self.token_manager.command);
        Self::apply_env_duration("TOKEN_WAIT_TIMEOUT", &mut self.token_manager.ready_timeout)?;
        Self::apply_env_duration(
            "TOKEN_MANAGER_STOP_TIMEOUT",
            &mut self.token_manager.stop_timeout,
        )?;
        Self::apply_env_option_string(
            "READINESS_CMD",
            &mut self.token_manager.readiness_command,
        );
        self.token_manager.token_db = match Self::env_value("OPEN115_TOKEN_DB") {
            Some(path) => PathBuf::from(path),
            None => TokenManagerConfig::default_token_db(Self::env_value("TMPDIR").as_deref()),
        };

        // Logging
        Self::apply_env_parse("LOG_LEVEL", &mut self.logging.level)?;
        Self::apply_env_bool("LOG_COLORED", &mut self.logging.colored);

        Ok(())
    }

    /// Helper: Read a variable, treating an empty value as unset
    fn env_value(var_name: &str) -> Option<String> {
        std::env::var(var_name)
            .ok()
            .filter(|val| !val.trim().is_empty())
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Some(val) = Self::env_value(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Some(val) = Self::env_value(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values.
    /// A value that does not parse is an error, not a silent fallback.
    #[track_caller]
    fn apply_env_parse<T>(var_name: &str, target: &mut T) -> ConfigErrorResult<()>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        if let Some(val) = Self::env_value(var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid_env(var_name, &val, e))?;
        }
        Ok(())
    }

    /// Helper: Apply environment variable override for durations
    #[track_caller]
    fn apply_env_duration(var_name: &str, target: &mut Duration) -> ConfigErrorResult<()> {
        if let Some(val) = Self::env_value(var_name) {
            *target = parse_duration(&val)
                .map_err(|reason| ConfigError::invalid_env(var_name, &val, reason))?;
        }
        Ok(())
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Some(val) = Self::env_value(var_name) {
            *target = Some(val);
        }
    }
}
