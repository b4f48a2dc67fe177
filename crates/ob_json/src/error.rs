use alloc::string::String;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// EncodeError

/// A fatal error raised while building an envelope.
///
/// Unreadable properties are not errors, they are skipped.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("cannot serialize `{class}::{property}`: `{kind}` has no json representation")]
    UnsupportedValue {
        class: &'static str,
        property: String,
        kind: &'static str,
    },

    #[error("serializing `{class}` exceeds the maximum nesting depth of {max_depth}")]
    DepthLimitExceeded { class: &'static str, max_depth: usize },

    #[error("custom codec for `{class}` failed: {message}")]
    Custom { class: &'static str, message: String },
}

// -----------------------------------------------------------------------------
// DecodeErrorKind

/// The root cause of an aborted decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// The envelope has zero or more than one key, or a value has the wrong json shape.
    MalformedEnvelope,
    /// A serial name or class name is not in the registry.
    UnregisteredType,
    /// The resolved class has no default constructor.
    NotConstructible,
    /// A value could not be written and the property is not resettable.
    PropertyWriteFailed,
    /// The object graph is nested deeper than [`CodecOptions::max_depth`](crate::CodecOptions).
    DepthLimitExceeded,
    /// The decoded object is not of the requested type.
    TypeMismatch,
    /// A custom codec rejected its input.
    Custom,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MalformedEnvelope => "malformed envelope",
            Self::UnregisteredType => "unregistered type",
            Self::NotConstructible => "not constructible",
            Self::PropertyWriteFailed => "property write failed",
            Self::DepthLimitExceeded => "depth limit exceeded",
            Self::TypeMismatch => "type mismatch",
            Self::Custom => "custom codec error",
        })
    }
}

// -----------------------------------------------------------------------------
// DecodeError

/// An aborted decode, carrying the accumulated message of every enclosing level.
///
/// Lines are ordered innermost first.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}:\n{message}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    message: String,
}

impl DecodeError {
    #[inline]
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[inline]
    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// -----------------------------------------------------------------------------
// RegistryError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("class `{0}` is not registered for deserialization")]
    UnregisteredType(String),
}
