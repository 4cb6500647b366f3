//! Error types for HealthBuddy
//!
//! Only `NoSymptomsProvided` is ever surfaced by the inference engine.
//! Every other variant is absorbed by tier fallthrough or logged.

use thiserror::Error;

/// Main error type for the inference engine and its collaborators
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Caller supplied no usable symptoms
    #[error("No symptoms provided")]
    NoSymptomsProvided,

    /// Trained model artifacts missing, inconsistent or failing at runtime
    #[error("Trained model unavailable: {0}")]
    ModelUnavailable(String),

    /// Symptoms or labels could not be encoded/decoded for the model
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Reference dataset missing or empty
    #[error("Reference data unavailable: {0}")]
    ReferenceDataUnavailable(String),

    /// Prediction history write failed
    #[error("Failed to persist prediction: {0}")]
    PersistenceFailure(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid advice severity or similar caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Tabular reader errors
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Tensor backend errors
    #[error("Tensor error: {0}")]
    TensorError(#[from] candle_core::Error),

    /// Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

impl InferenceError {
    /// Whether the error is a caller mistake rather than an internal failure
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            InferenceError::NoSymptomsProvided | InferenceError::InvalidInput(_)
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Convert anyhow errors to InferenceError
impl From<anyhow::Error> for InferenceError {
    fn from(err: anyhow::Error) -> Self {
        InferenceError::Generic(err.to_string())
    }
}
