use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_APP_MODULE, DEFAULT_HOST, DEFAULT_HTTP, DEFAULT_LOOP,
    DEFAULT_PORT, DEFAULT_SERVER_PROGRAM, WorkerSetting,
};

/// Settings handed to the main server on handoff.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Executable that serves the application
    pub program: String,
    /// Importable `module:attribute` target
    pub app_module: String,
    pub host: String,
    pub port: u16,
    /// Event loop implementation (`--loop`)
    pub loop_impl: String,
    /// HTTP protocol implementation (`--http`)
    pub http_impl: String,
    pub workers: WorkerSetting,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            program: String::from(DEFAULT_SERVER_PROGRAM),
            app_module: String::from(DEFAULT_APP_MODULE),
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            loop_impl: String::from(DEFAULT_LOOP),
            http_impl: String::from(DEFAULT_HTTP),
            workers: WorkerSetting::Auto,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let required = [
            ("server program", &self.program),
            ("app module", &self.app_module),
            ("host", &self.host),
            ("loop implementation", &self.loop_impl),
            ("http implementation", &self.http_impl),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::server(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }
}
