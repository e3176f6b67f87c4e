//! Error taxonomy shared by every typex crate.
//!
//! None of these errors are retried anywhere: each one signals either
//! malformed input or a caller contract violation.

use thiserror::Error;

/// Result alias used across the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Unparsable type text: unbalanced brackets, unexpected token, bad escape.
    #[error("malformed type literal {input:?}: {reason}")]
    MalformedInput { input: String, reason: String },

    /// Instantiation argument count differs from the declared parameter count.
    #[error("{name}: expected {expected} type arguments, got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Free type parameters, result tuples, constraint unions and
    /// uninstantiated generics have no literal form.
    #[error("unsupported type category: {0}")]
    UnsupportedTypeCategory(String),

    /// The package loader could not produce a declaration.
    #[error("lookup of {path}.{name} failed: {reason}")]
    LookupFailure {
        path: String,
        name: String,
        reason: String,
    },

    /// A set-once declaration body was assigned a second time.
    #[error("{0} is already defined")]
    Redefined(String),

    /// Embedding traversal grew past the configured bound.
    #[error("embedding traversal exceeded {limit} pending steps at {at}")]
    TraversalLimit { limit: usize, at: String },
}

impl Error {
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(what: impl Into<String>) -> Self {
        Error::UnsupportedTypeCategory(what.into())
    }

    pub fn arity(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Error::ArityMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    pub fn lookup(
        path: impl Into<String>,
        name: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Error::LookupFailure {
            path: path.into(),
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
