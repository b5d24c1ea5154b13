//! Shared fixtures for supervisor integration tests.

#![allow(dead_code)]

use op_supervisor::{ReadinessOutcome, ReadinessProbe};

use op_config::Config;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

/// Probe that waits for the background process to announce itself, then
/// reports a fixed outcome.
///
/// The background command writes its PID to `pid_file`, so a probe that
/// sees the file also proves the process was launched first.
pub struct ScriptedProbe {
    pub pid_file: PathBuf,
    pub outcome: ReadinessOutcome,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(pid_file: &Path, outcome: ReadinessOutcome) -> Self {
        Self {
            pid_file: pid_file.to_path_buf(),
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadinessProbe for ScriptedProbe {
    fn describe(&self) -> String {
        String::from("scripted probe")
    }

    async fn wait_ready(&self, timeout: Duration) -> ReadinessOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if wait_for_pid(&self.pid_file, timeout).await.is_none() {
            return ReadinessOutcome::Error(String::from("background process never started"));
        }
        self.outcome.clone()
    }
}

/// Poll until `pid_file` holds a PID.
pub async fn wait_for_pid(pid_file: &Path, timeout: Duration) -> Option<i32> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(pid) = read_pid(pid_file) {
            return Some(pid);
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

pub fn read_pid(pid_file: &Path) -> Option<i32> {
    std::fs::read_to_string(pid_file)
        .ok()
        .and_then(|text| text.trim().parse().ok())
}

/// Background command that records its PID and then keeps running.
pub fn pid_recording_command(pid_file: &Path) -> String {
    format!("sh -c 'echo $$ > {}; exec sleep 30'", pid_file.display())
}

pub fn is_alive(pid: i32) -> bool {
    kill(Pid::from_raw(pid), None).is_ok()
}

pub fn kill_process(pid: i32) {
    let _ = kill(Pid::from_raw(pid), Signal::SIGKILL);
}

/// Defaults with short timeouts, independent of the test environment.
pub fn test_config(command: String) -> Config {
    let mut config = Config::default();
    config.token_manager.command = command;
    config.token_manager.ready_timeout = Duration::from_secs(5);
    config.token_manager.stop_timeout = Duration::from_secs(2);
    config
}
