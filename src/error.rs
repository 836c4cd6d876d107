//! Error types for the banditry library.

use thiserror::Error;

/// Result type alias for bandit operations.
pub type Result<T> = std::result::Result<T, BanditError>;

/// Errors that can occur during bandit operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    /// An arm index outside `[0, k)` was passed to a policy.
    #[error("arm {arm} out of range for {k} arms")]
    ArmOutOfRange { arm: usize, k: usize },

    /// No arms are available to the experiment.
    #[error("no arms available")]
    NoArmsAvailable,

    /// Mismatch in the dimensions of input data.
    #[error("dimension mismatch: {message}")]
    DimensionMismatch { message: String },

    /// Invalid construction parameter.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Builder configuration error.
    #[error("builder error: {message}")]
    BuilderError { message: String },
}

impl BanditError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BanditError::InvalidParameter {
            message: message.into(),
        }
    }
}
