//! Error types for the Markwright core.

/// Core error type for Markwright infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A name that must be a valid XML NCName is not.
    #[error("invalid XML name: {0:?}")]
    InvalidName(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
