pub mod cli;
pub mod concurrency;
pub mod error;
pub mod handoff;
pub mod launcher;
pub mod logger;
pub mod readiness;
pub mod supervisor;
pub mod supervisor_state;

#[cfg(test)]
mod tests;

pub use crate::error::{Result as SupervisorResult, SupervisorError};
pub use crate::handoff::HandoffPlan;
pub use crate::launcher::{BackgroundProcess, Teardown};
pub use crate::readiness::{
    CommandProbe, ReadinessOutcome, ReadinessProbe, TokenStoreProbe, probe_for,
};
pub use crate::supervisor::Supervisor;
pub use crate::supervisor_state::SupervisorState;
