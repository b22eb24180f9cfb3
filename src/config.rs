use crate::domain::split::DEFAULT_ROUND_TO;

pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

/// Tunables for [`PaymentRequestEngine`](crate::application::engine::PaymentRequestEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Rounding step used when splitting a total evenly.
    pub round_to: u64,
    /// How many times a transition is re-read and re-applied after losing a
    /// race with a concurrent writer.
    pub max_conflict_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_to: DEFAULT_ROUND_TO,
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
        }
    }
}
