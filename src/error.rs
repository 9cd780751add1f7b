//! Error types for inclearn.

use thiserror::Error;

/// inclearn error types.
#[derive(Error, Debug)]
pub enum LearnError {
    /// Observation length does not match the configured dimensionality
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Norm order other than 1 or 2
    #[error("Unimplemented norm l{0}")]
    UnsupportedNorm(u32),

    /// Renormalisation would divide by a zero or near-zero norm
    #[error("Degenerate norm: {context}")]
    DegenerateNorm { context: String },

    /// Empty input where non-empty was required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Configuration validation failed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Eigendecomposition or other matrix computation failed
    #[error("Linear algebra error: {0}")]
    Linalg(String),

    /// JSON parsing error (configuration files)
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Result type alias for inclearn operations.
pub type Result<T> = std::result::Result<T, LearnError>;

impl LearnError {
    /// Fail fast unless `got == expected`.
    pub fn check_dim(expected: usize, got: usize) -> Result<()> {
        if expected == got {
            Ok(())
        } else {
            Err(Self::DimensionMismatch { expected, got })
        }
    }

    pub fn degenerate(context: impl Into<String>) -> Self {
        Self::DegenerateNorm {
            context: context.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dim() {
        assert!(LearnError::check_dim(4, 4).is_ok());
        match LearnError::check_dim(4, 3) {
            Err(LearnError::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, 4);
                assert_eq!(got, 3);
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let err = LearnError::UnsupportedNorm(3);
        assert_eq!(err.to_string(), "Unimplemented norm l3");
        let err = LearnError::degenerate("column 2");
        assert!(err.to_string().contains("column 2"));
    }
}
