//! Clone error types

use thiserror::Error;

/// Errors raised while cloning or while running native functions on cloned values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloneError {
    /// The top-level value was `undefined` or `null`
    #[error("Cannot clone undefined or null")]
    InvalidInput,

    /// Type error raised by a native function (e.g. an accessor setter)
    #[error("{0}")]
    TypeError(String),

    /// Opaque object whose class cannot be constructed from an instance of itself
    #[error("{0} is not constructible from an existing instance")]
    NotConstructible(String),

    /// Failure raised by an opaque object's own copy constructor
    #[error("{0}")]
    Construction(String),

    /// Nesting went past the configured depth limit
    #[error("Maximum clone depth of {0} exceeded")]
    DepthExceeded(usize),
}

impl CloneError {
    /// Create a type error
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a delegated construction error
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }
}

/// Result type for clone operations
pub type CloneResult<T> = std::result::Result<T, CloneError>;
