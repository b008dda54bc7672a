//! CWT error types

/// Errors raised by the transform engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CwtError {
    /// A caller-supplied parameter is outside its valid range
    #[error("Invalid argument `{name}`: {constraint}")]
    InvalidArgument { name: String, constraint: String },

    /// Plan creation, thread pool or buffer allocation failed
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Internal inconsistency detected during the transform
    #[error("Fatal: {0}")]
    Fatal(String),
}

impl CwtError {
    pub(crate) fn invalid(name: &str, constraint: impl Into<String>) -> Self {
        CwtError::InvalidArgument {
            name: name.to_string(),
            constraint: constraint.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CwtError>;
