//! Startup choreography: launch, gate, resolve, hand off or tear down.

use crate::concurrency::{host_parallelism, resolve_workers};
use crate::error::{Result as SupervisorResult, SupervisorError};
use crate::handoff::HandoffPlan;
use crate::launcher;
use crate::readiness::{ReadinessOutcome, ReadinessProbe};
use crate::supervisor_state::SupervisorState;

use op_config::Config;

use std::io;

use log::{debug, error, info};

/// Drives one startup attempt.
///
/// Strictly sequential: the token manager is launched before the probe
/// runs, and the probe finishes before handoff or teardown begins.
pub struct Supervisor<'a> {
    config: &'a Config,
    probe: &'a dyn ReadinessProbe,
    detect_parallelism: fn() -> io::Result<usize>,
    state: SupervisorState,
    history: Vec<SupervisorState>,
}

impl<'a> Supervisor<'a> {
    pub fn new(config: &'a Config, probe: &'a dyn ReadinessProbe) -> Self {
        Self {
            config,
            probe,
            detect_parallelism: host_parallelism,
            state: SupervisorState::Starting,
            history: vec![SupervisorState::Starting],
        }
    }

    /// Replace host CPU detection, e.g. to pin the topology in tests.
    pub fn with_parallelism(mut self, detect: fn() -> io::Result<usize>) -> Self {
        self.detect_parallelism = detect;
        self
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Every state visited so far, starting with `Starting`.
    pub fn history(&self) -> &[SupervisorState] {
        &self.history
    }

    /// Run the startup sequence once.
    ///
    /// On success the token manager is left running and the server
    /// invocation is returned for the caller to exec. On readiness failure
    /// the token manager is stopped before the error is returned.
    pub async fn run(&mut self, passthrough: &[String]) -> SupervisorResult<HandoffPlan> {
        let config = self.config;
        let token_manager = &config.token_manager;

        let background = launcher::launch(&token_manager.command)?;
        self.transition(SupervisorState::AwaitingReadiness);

        info!(
            "Waiting up to {} for {}",
            humantime::format_duration(token_manager.ready_timeout),
            self.probe.describe()
        );
        let outcome = self.probe.wait_ready(token_manager.ready_timeout).await;

        let failure = match outcome {
            ReadinessOutcome::Ready => {
                self.transition(SupervisorState::Ready);
                info!("Token manager ready");
                background.release();

                let workers = resolve_workers(&config.server.workers, self.detect_parallelism);
                let plan = HandoffPlan::for_server(&config.server, &workers, passthrough);

                self.transition(SupervisorState::HandedOff);
                return Ok(plan);
            }
            ReadinessOutcome::TimedOut => SupervisorError::not_ready(token_manager.ready_timeout),
            ReadinessOutcome::Error(reason) => SupervisorError::readiness_failed(reason),
        };

        self.transition(SupervisorState::FailedReadiness);
        error!("{failure}");

        let teardown = background.terminate(token_manager.stop_timeout).await;
        debug!("Teardown finished: {teardown:?}");
        self.transition(SupervisorState::Terminated);

        Err(failure)
    }

    fn transition(&mut self, next: SupervisorState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid supervisor transition {:?} -> {next:?}",
            self.state
        );
        debug!("Supervisor state: {:?} -> {next:?}", self.state);
        self.state = next;
        self.history.push(next);
    }
}
