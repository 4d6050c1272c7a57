//! Error types for impress-attrmap

use impress_identifiers::ValueError;
use thiserror::Error;

/// Result type alias for attribute map operations
pub type Result<T> = std::result::Result<T, AttrError>;

/// Errors raised by registries, factories, codecs and maps
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttrError {
    /// Value construction or casting failed
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A registry has no entry with the requested name
    #[error("unknown {registry} '{name}': expected one of {expected}")]
    UnknownStrategy {
        registry: String,
        name: String,
        expected: String,
    },

    /// A registry has no default selected
    #[error("no {registry} selected")]
    EmptyRegistry { registry: String },

    /// The strict factory has no value kind for a key
    #[error("no value kind for key '{key}'")]
    UnknownKey { key: String },

    /// A decoder rejected its input
    #[error("cannot decode {input:?} as {codec}: {reason}")]
    Decode {
        codec: String,
        input: String,
        reason: String,
    },
}

impl AttrError {
    pub(crate) fn decode(codec: &str, input: &str, reason: impl Into<String>) -> Self {
        AttrError::Decode {
            codec: codec.to_string(),
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
