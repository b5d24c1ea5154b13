//! Token manager process launch and teardown.

use crate::error::{Result as SupervisorResult, SupervisorError};

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use log::{info, warn};
use tokio::process::{Child, Command};

/// Handle to the running token manager.
///
/// The supervisor owns it until the readiness decision. It is then either
/// released (the process keeps running next to the server) or consumed by
/// [`BackgroundProcess::terminate`]. Both paths take `self`, so the handle
/// cannot be used afterwards.
#[derive(Debug)]
pub struct BackgroundProcess {
    child: Child,
    pid: u32,
    command: String,
}

/// How teardown ended.
#[derive(Debug)]
pub enum Teardown {
    /// Exited within the grace period after SIGTERM
    Terminated(ExitStatus),
    /// Still running after the grace period and killed
    Killed(ExitStatus),
    /// Could not be reaped; the error was logged
    Lost,
}

/// Spawn `command` without waiting for it.
///
/// The command line is split with POSIX shell-word rules; the child
/// inherits the environment, stdout and stderr. Must be called from
/// within a Tokio runtime.
pub fn launch(command: &str) -> SupervisorResult<BackgroundProcess> {
    let argv = shlex::split(command)
        .filter(|argv| !argv.is_empty())
        .ok_or_else(|| {
            SupervisorError::launch(
                command,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "command is empty or has unbalanced quotes",
                ),
            )
        })?;

    let child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::null())
        .spawn()
        .map_err(|e| SupervisorError::launch(command, e))?;

    let pid = child.id().ok_or_else(|| {
        SupervisorError::launch(
            command,
            io::Error::other("process exited before its pid could be read"),
        )
    })?;

    info!("Spawned token manager with PID {pid}: {command}");

    Ok(BackgroundProcess {
        child,
        pid,
        command: command.to_string(),
    })
}

impl BackgroundProcess {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Give up ownership without signaling; the process keeps running.
    pub fn release(self) -> u32 {
        info!(
            "Leaving token manager (PID {}) running alongside the server",
            self.pid
        );
        self.pid
    }

    /// Ask the process to stop, escalate to SIGKILL after `grace`, and reap it.
    ///
    /// Best effort: signal and wait failures (including a process that has
    /// already exited) are logged, never returned.
    pub async fn terminate(mut self, grace: Duration) -> Teardown {
        let pid = self.pid;
        info!("Stopping token manager (PID {pid})");

        if let Err(e) = self.request_stop() {
            warn!("Failed to signal token manager (PID {pid}): {e}");
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                info!("Token manager (PID {pid}) exited: {status}");
                Teardown::Terminated(status)
            }
            Ok(Err(e)) => {
                warn!("Failed to wait for token manager (PID {pid}): {e}");
                Teardown::Lost
            }
            Err(_) => {
                warn!(
                    "Token manager (PID {pid}) still running after {}, killing",
                    humantime::format_duration(grace)
                );

                if let Err(e) = self.child.start_kill() {
                    warn!("Failed to kill token manager (PID {pid}): {e}");
                }

                match self.child.wait().await {
                    Ok(status) => Teardown::Killed(status),
                    Err(e) => {
                        warn!("Failed to wait for token manager (PID {pid}): {e}");
                        Teardown::Lost
                    }
                }
            }
        }
    }

    #[cfg(unix)]
    fn request_stop(&mut self) -> io::Result<()> {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        kill(Pid::from_raw(self.pid as i32), Signal::SIGTERM).map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn request_stop(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }
}
