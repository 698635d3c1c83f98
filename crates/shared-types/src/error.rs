use thiserror::Error;

/// Errors raised by span resolution and deduplication
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RedactError {
    /// Malformed input the caller must fix (inverted span, bad quad, unknown mode)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A canonical offset has no backing character record.
    /// The text index is inconsistent and must not be used further.
    #[error("No character record mapped to canonical offset {offset}")]
    MappingGap { offset: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RedactError {
    pub fn validation(msg: impl Into<String>) -> Self {
        RedactError::Validation(msg.into())
    }
}

impl From<serde_json::Error> for RedactError {
    fn from(e: serde_json::Error) -> Self {
        RedactError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RedactError>;
