use thiserror::Error;

/// Main error type for the ParaSweep system
#[derive(Error, Debug)]
pub enum PsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Advisor error: {0}")]
    Advisor(String),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ParaSweep operations
pub type PsResult<T> = Result<T, PsError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::PsError::Validation(format!($($arg)*))
    };
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        $crate::PsError::Internal(format!($($arg)*))
    };
}
