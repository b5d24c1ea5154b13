use crate::readiness::{ReadinessOutcome, ReadinessProbe};

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

/// Extra time a readiness command gets beyond its own budget before it is killed
const COMMAND_GRACE: Duration = Duration::from_secs(2);

/// Runs an external readiness command once.
///
/// The budget is exported to the command as `READINESS_TIMEOUT` (seconds).
/// Exit status 0 means ready; any other status is an error.
pub struct CommandProbe {
    command: String,
}

impl CommandProbe {
    pub fn new(command: String) -> Self {
        Self { command }
    }
}

#[async_trait]
impl ReadinessProbe for CommandProbe {
    fn describe(&self) -> String {
        format!("command `{}`", self.command)
    }

    async fn wait_ready(&self, timeout: Duration) -> ReadinessOutcome {
        let argv = match shlex::split(&self.command) {
            Some(argv) if !argv.is_empty() => argv,
            _ => {
                return ReadinessOutcome::Error(format!(
                    "readiness command {:?} is empty or has unbalanced quotes",
                    self.command
                ));
            }
        };

        let mut child = match Command::new(&argv[0])
            .args(&argv[1..])
            .env("READINESS_TIMEOUT", timeout.as_secs_f64().to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return ReadinessOutcome::Error(format!("failed to run `{}`: {e}", argv[0]));
            }
        };

        let budget = timeout.saturating_add(COMMAND_GRACE);
        match tokio::time::timeout(budget, child.wait()).await {
            Ok(Ok(status)) if status.success() => ReadinessOutcome::Ready,
            Ok(Ok(status)) => {
                debug!("Readiness command exited with {status}");
                ReadinessOutcome::Error(format!("readiness command exited with {status}"))
            }
            Ok(Err(e)) => ReadinessOutcome::Error(format!("failed to wait for `{}`: {e}", argv[0])),
            Err(_) => {
                warn!(
                    "Readiness command overran its {} budget, killing it",
                    humantime::format_duration(timeout)
                );
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill readiness command: {e}");
                }
                ReadinessOutcome::TimedOut
            }
        }
    }
}
