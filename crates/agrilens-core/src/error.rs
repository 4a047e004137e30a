use thiserror::Error;

/// Validation and contract errors exposed by `agrilens-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("latitude {value} out of range [-90, 90]")]
    LatitudeOutOfRange { value: f64 },
    #[error("longitude {value} out of range [-180, 180]")]
    LongitudeOutOfRange { value: f64 },

    #[error("credential chain '{chain}' must contain at least one credential")]
    EmptyCredentialChain { chain: String },
    #[error("credential label cannot be empty")]
    EmptyCredentialLabel,
    #[error("credential key cannot be empty")]
    EmptyCredentialKey,

    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("commodity cannot be empty")]
    EmptyCommodity,
    #[error("region cannot be empty")]
    EmptyRegion,
    #[error("text to translate cannot be empty")]
    EmptyTranslationInput,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
