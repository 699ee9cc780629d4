//! Error taxonomy shared by the prediction, scheduling and history features
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

/// Errors surfaced by engine operations.
///
/// `InvalidInput` is recoverable by re-prompting the user. `DimensionMismatch`
/// is a configuration fault. `Unauthenticated` blocks the predict-and-save flow
/// until a user signs in. `StorageUnavailable` is transient and never discards
/// a prediction that was already computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdherenceError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no signed-in user")]
    Unauthenticated,

    #[error("storage unavailable: {reason}")]
    StorageUnavailable { reason: String },
}

impl AdherenceError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AdherenceError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn storage(reason: impl std::fmt::Display) -> Self {
        AdherenceError::StorageUnavailable {
            reason: reason.to_string(),
        }
    }

    /// Whether the user can fix this by correcting their input
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, AdherenceError::InvalidInput { .. })
    }

    /// Whether retrying the same call later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, AdherenceError::StorageUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, AdherenceError>;
