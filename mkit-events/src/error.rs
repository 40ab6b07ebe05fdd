//! Error types for scoped values.

/// Errors raised when reading a scoped value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// No scope of the requested context is entered on this thread.
    #[error("Context is null")]
    NotFound,
}

/// Convenient Result type for scope lookups.
pub type Result<T> = std::result::Result<T, ScopeError>;
