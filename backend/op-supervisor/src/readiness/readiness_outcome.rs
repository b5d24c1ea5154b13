/// Result of a single readiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessOutcome {
    Ready,
    /// The shared state was not populated within the budget
    TimedOut,
    /// The check could not be carried out
    Error(String),
}
