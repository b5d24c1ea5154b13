mod config;
mod error;
mod log_level;
mod logging_config;
mod server_config;
mod token_manager_config;
mod worker_setting;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;
pub use token_manager_config::{TokenManagerConfig, parse_duration};
pub use worker_setting::WorkerSetting;

const DEFAULT_SERVER_PROGRAM: &str = "uvicorn";
const DEFAULT_APP_MODULE: &str = "app.main:app";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOOP: &str = "uvloop";
const DEFAULT_HTTP: &str = "httptools";
const AUTO_WORKERS: &str = "auto";

const DEFAULT_TOKEN_MANAGER_COMMAND: &str = "python -m app.service.token_manager";
const DEFAULT_READY_TIMEOUT_SECS: u64 = 60;
const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TMP_DIR: &str = "/tmp";
const DEFAULT_TOKEN_DB_FILENAME: &str = "open115-tokens.sqlite3";

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
