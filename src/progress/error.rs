//! Domain errors for the progression engine

/// Errors raised by progression use-cases
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// XP rewards must be non-negative
    #[error("Invalid XP reward: {amount} (must be >= 0)")]
    InvalidReward { amount: i64 },
}

/// Validate a caller-supplied XP amount
pub fn validate_reward(amount: i64) -> Result<u64, ProgressError> {
    u64::try_from(amount).map_err(|_| ProgressError::InvalidReward { amount })
}
