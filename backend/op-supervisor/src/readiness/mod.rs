//! Readiness gate: one bounded call to a readiness primitive.

mod command_probe;
mod readiness_outcome;
mod token_store_probe;

pub use command_probe::CommandProbe;
pub use readiness_outcome::ReadinessOutcome;
pub use token_store_probe::TokenStoreProbe;

use op_config::TokenManagerConfig;

use std::time::Duration;

use async_trait::async_trait;

/// A black-box check that shared state is usable.
///
/// Implementations own any polling; callers invoke `wait_ready` once and
/// must not retry.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Short description used in logs
    fn describe(&self) -> String;

    /// Wait up to `timeout` and report exactly one outcome.
    async fn wait_ready(&self, timeout: Duration) -> ReadinessOutcome;
}

/// Pick the probe configured for this process.
pub fn probe_for(config: &TokenManagerConfig) -> Box<dyn ReadinessProbe> {
    match config.readiness_command {
        Some(ref command) => Box::new(CommandProbe::new(command.clone())),
        None => Box::new(TokenStoreProbe::new(config.token_db.clone())),
    }
}
