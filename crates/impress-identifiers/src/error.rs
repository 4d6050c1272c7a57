//! Error types for identifier values

use thiserror::Error;

/// Result type alias for value construction and casting
pub type Result<T> = std::result::Result<T, ValueError>;

/// Errors raised while constructing or casting identifier values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A parser rejected its input
    #[error("malformed {kind}: {input:?}")]
    MalformedInput { kind: &'static str, input: String },

    /// The input had the right shape but a wrong check digit
    #[error("invalid {kind} checksum: {input:?}")]
    InvalidChecksum { kind: &'static str, input: String },

    /// The value has no representation of the requested kind
    #[error("{kind} cannot be cast to {target}")]
    UnsupportedCast { kind: &'static str, target: &'static str },

    /// The registration range message could not be read
    #[error("ISBN range message: {0}")]
    RangeSource(String),
}

impl ValueError {
    pub(crate) fn malformed(kind: &'static str, input: impl Into<String>) -> Self {
        ValueError::MalformedInput {
            kind,
            input: input.into(),
        }
    }

    /// True for `MalformedInput` and its `InvalidChecksum` specialization.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ValueError::MalformedInput { .. } | ValueError::InvalidChecksum { .. }
        )
    }
}
