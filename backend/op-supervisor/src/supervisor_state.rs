/// Startup phase of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Starting,
    /// Token manager launched, readiness check in progress
    AwaitingReadiness,
    Ready,
    FailedReadiness,
    /// Server invocation resolved; terminal on success
    HandedOff,
    /// Token manager torn down; terminal on failure
    Terminated,
}

impl SupervisorState {
    pub fn can_transition_to(self, next: SupervisorState) -> bool {
        use SupervisorState::*;

        matches!(
            (self, next),
            (Starting, AwaitingReadiness)
                | (AwaitingReadiness, Ready)
                | (AwaitingReadiness, FailedReadiness)
                | (Ready, HandedOff)
                | (FailedReadiness, Terminated)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::HandedOff | Self::Terminated)
    }
}
