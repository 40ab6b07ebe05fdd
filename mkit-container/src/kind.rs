//! Service registration kinds.
//!
//! - [`ServiceKind::Declare`]: placeholder, fulfilled later by a lazy definition
//! - [`ServiceKind::Lazy`]: built on first read, then cached
//! - [`ServiceKind::Eager`]: built while the container is resolved
use std::fmt;

/// How a definition produces its value.
///
/// # Examples
/// ```
/// use mkit_container::kind::ServiceKind;
///
/// assert!(ServiceKind::Lazy.is_deferred());
/// assert!(!ServiceKind::Eager.is_deferred());
/// assert!(!ServiceKind::Declare.provides_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Reserves a key without providing a value.
    ///
    /// Reading it fails until a later `lazy` definition fulfils it.
    Declare,

    /// Built on first read with the container as input.
    ///
    /// The factory runs at most once; later reads return the cached value.
    Lazy,

    /// Built immediately, in registration order, during resolution.
    ///
    /// An asynchronous eager factory makes the whole resolution asynchronous.
    Eager,
}

impl ServiceKind {
    /// Returns `true` if the value is built on first read.
    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, ServiceKind::Lazy)
    }

    /// Returns `true` if the definition supplies a value at all.
    #[inline]
    pub fn provides_value(&self) -> bool {
        !matches!(self, ServiceKind::Declare)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Declare => write!(f, "declare"),
            ServiceKind::Lazy => write!(f, "lazy"),
            ServiceKind::Eager => write!(f, "eager"),
        }
    }
}
