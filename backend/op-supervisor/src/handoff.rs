//! Transfer of control to the main server.

use crate::error::SupervisorError;

use op_config::ServerConfig;

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;

/// The server invocation produced by a successful startup.
///
/// Building the plan has no side effects; [`HandoffPlan::exec`] performs
/// the actual process replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffPlan {
    pub program: String,
    pub args: Vec<String>,
}

impl HandoffPlan {
    /// Resolved server flags followed by the caller's passthrough arguments.
    pub fn for_server(server: &ServerConfig, workers: &str, passthrough: &[String]) -> Self {
        let mut args = vec![
            server.app_module.clone(),
            String::from("--host"),
            server.host.clone(),
            String::from("--port"),
            server.port.to_string(),
            String::from("--loop"),
            server.loop_impl.clone(),
            String::from("--http"),
            server.http_impl.clone(),
            String::from("--workers"),
            workers.to_string(),
        ];
        args.extend(passthrough.iter().cloned());

        Self {
            program: server.program.clone(),
            args,
        }
    }

    /// Replace the current process image with the server.
    ///
    /// Only returns on failure.
    #[cfg(unix)]
    pub fn exec(self) -> SupervisorError {
        use std::os::unix::process::CommandExt;

        let source = std::process::Command::new(&self.program)
            .args(&self.args)
            .exec();

        SupervisorError::Handoff {
            program: self.program,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Run the server to completion and exit with its status.
    ///
    /// Only returns on failure.
    #[cfg(not(unix))]
    pub fn exec(self) -> SupervisorError {
        match std::process::Command::new(&self.program)
            .args(&self.args)
            .status()
        {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(source) => SupervisorError::Handoff {
                program: self.program,
                source,
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl fmt::Display for HandoffPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(&self.args);
        match shlex::try_join(words.map(String::as_str)) {
            Ok(line) => f.write_str(&line),
            Err(_) => write!(f, "{} {:?}", self.program, self.args),
        }
    }
}
