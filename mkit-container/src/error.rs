//! Error types for container registration and resolution.
//!
//! Every error here is a programming error at the call site: nothing is
//! retried or swallowed by the container.

use std::fmt;
use std::sync::Arc;

use mkit_support::rendering::render_chain;

/// Main error type for all container operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContainerError {
    /// The key collides with a built-in object-protocol name.
    #[error("Cannot redefine built-in property \"{0}\"")]
    ReservedKey(String),

    /// The key already has a lazy or eager definition.
    #[error("Service \"{0}\" is already defined")]
    AlreadyDefined(String),

    /// The key was declared twice.
    #[error("Service \"{0}\" is already declared")]
    AlreadyDeclared(String),

    /// A declared key was later given an eager definition.
    #[error("Declared service \"{0}\" cannot be provided eagerly")]
    DeclaredCannotBeEager(String),

    /// A declared key was read before any definition fulfilled it.
    #[error("Declared service \"{0}\" is not provided")]
    NotProvided(String),

    /// The key was never registered.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// A lazy factory re-entered a key that is still being built.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// The stored value is not of the requested type.
    #[error("Service \"{key}\" is not of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// A factory reported its own failure.
    #[error("Failed to construct \"{key}\": {source}")]
    ConstructionFailed {
        key: String,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The container is still waiting on an asynchronous eager service.
    #[error("Container resolution is still pending an asynchronous service")]
    PendingResolution,
}

impl ContainerError {
    /// Wraps an error raised inside a factory.
    ///
    /// ```
    /// use mkit_container::ContainerError;
    ///
    /// let err = ContainerError::construction("database", std::io::Error::other("refused"));
    /// assert_eq!(err.to_string(), "Failed to construct \"database\": refused");
    /// ```
    pub fn construction(
        key: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ContainerError::ConstructionFailed {
            key: key.into(),
            source: Arc::new(source),
        }
    }
}

/// Error when a read names a key that was never registered.
#[derive(Debug, Clone)]
pub struct NotRegisteredError {
    /// The key that was requested
    pub requested: String,
    /// Registered keys with similar names
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service \"{}\" is not registered", self.requested)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        Ok(())
    }
}

/// Error when lazy factories depend on each other in a loop.
///
/// The chain starts and ends with the re-entered key.
#[derive(Debug, Clone)]
pub struct CircularDependencyError {
    pub chain: Vec<String>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular dependency detected:\n  {}", render_chain(&self.chain))
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
