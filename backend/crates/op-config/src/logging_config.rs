use crate::LogLevel;

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Colored level names (off by default, container logs are not a TTY)
    pub colored: bool,
}
