//! Service identification keys.
//!
//! [`ServiceKey`] names a service within a container. Names that collide
//! with built-in object-protocol members are rejected so a container can be
//! exposed through property-style lookups without shadowing them.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::error::{ContainerError, Result};

/// Names that can never be used as service keys.
pub const RESERVED_KEYS: [&str; 12] = [
    "constructor",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "toLocaleString",
    "toString",
    "valueOf",
    "__proto__",
    "__defineGetter__",
    "__defineSetter__",
    "__lookupGetter__",
    "__lookupSetter__",
];

/// Returns `true` if `name` is one of [`RESERVED_KEYS`].
#[inline]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// A validated service name.
///
/// Cheap to clone; compares and hashes like the underlying string, so maps
/// keyed by `ServiceKey` can be queried with a plain `&str`.
///
/// # Examples
/// ```
/// use mkit_container::key::ServiceKey;
///
/// let key = ServiceKey::new("database").unwrap();
/// assert_eq!(key.as_str(), "database");
///
/// assert!(ServiceKey::new("toString").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(Arc<str>);

impl ServiceKey {
    /// Validates and wraps `name`.
    ///
    /// # Errors
    /// [`ContainerError::ReservedKey`] if `name` is reserved.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if is_reserved(name) {
            return Err(ContainerError::ReservedKey(name.to_string()));
        }
        Ok(Self(Arc::from(name)))
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ServiceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ServiceKey {
    type Error = ContainerError;

    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKey({:?})", &*self.0)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        let key = ServiceKey::new("userService").unwrap();
        assert_eq!(key.as_str(), "userService");
        assert_eq!(key.to_string(), "userService");
    }

    #[test]
    fn rejects_every_reserved_name() {
        for name in RESERVED_KEYS {
            match ServiceKey::new(name) {
                Err(ContainerError::ReservedKey(rejected)) => assert_eq!(rejected, name),
                other => panic!("Expected ReservedKey for {name}, got: {other:?}"),
            }
        }
    }

    #[test]
    fn reserved_check_is_case_sensitive() {
        assert!(ServiceKey::new("tostring").is_ok());
        assert!(ServiceKey::new("Constructor").is_ok());
    }

    #[test]
    fn key_in_hashmap_by_str() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ServiceKey::new("a").unwrap(), 1);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), None);
    }

    #[test]
    fn debug_shows_name() {
        let key = ServiceKey::new("logger").unwrap();
        assert_eq!(format!("{key:?}"), "ServiceKey(\"logger\")");
    }
}
