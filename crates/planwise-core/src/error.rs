use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanwiseError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PlanwiseError {
    fn from(e: serde_json::Error) -> Self {
        PlanwiseError::SerializationError(e.to_string())
    }
}
