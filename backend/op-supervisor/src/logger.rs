use crate::error::{Result as SupervisorErrorResult, SupervisorError};

use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, debug};

/// Initialize logger with fern.
///
/// Everything goes to stderr: stdout belongs to the server after handoff.
///
/// # Arguments
/// * `log_level` - Log level filter
/// * `colored` - Enable colored level names
#[track_caller]
pub fn initialize(log_level: op_config::LogLevel, colored: bool) -> SupervisorErrorResult<()> {
    let level_filter = log_level.0;

    let base_dispatch = Dispatch::new()
        .level(level_filter)
        .level_for("sqlx", LevelFilter::Warn);

    let dispatch = if colored {
        let colors = ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red);

        Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{target}]",
                    date = humantime::format_rfc3339_seconds(SystemTime::now()),
                    level = colors.color(record.level()),
                    message = message,
                    target = record.target(),
                ))
            })
            .chain(std::io::stderr())
    } else {
        Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{target}]",
                    date = humantime::format_rfc3339_seconds(SystemTime::now()),
                    level = record.level(),
                    message = message,
                    target = record.target(),
                ))
            })
            .chain(std::io::stderr())
    };

    base_dispatch
        .chain(dispatch)
        .apply()
        .map_err(|e| SupervisorError::runtime(format!("Failed to initialize logger: {e}")))?;

    debug!("Logger initialized: level={level_filter:?}, stderr");

    Ok(())
}
