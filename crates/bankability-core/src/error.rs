use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing input: {field} is required")]
    MissingInput { field: String },

    #[error("Unsupported depreciation class life: {class_life} years (supported: 5, 7)")]
    UnsupportedClassLife { class_life: u32 },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AssessmentError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AssessmentError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        AssessmentError::MissingInput {
            field: field.to_string(),
        }
    }
}

impl From<serde_json::Error> for AssessmentError {
    fn from(e: serde_json::Error) -> Self {
        AssessmentError::SerializationError(e.to_string())
    }
}
