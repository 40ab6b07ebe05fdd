//! Composition: pulling definitions from one registry into another.
//!
//! Anything implementing [`Import`] can be passed to
//! [`ContainerBuilder::import`](crate::container::ContainerBuilder::import):
//! another builder, an already built [`Container`], a [`ServiceMap`] of
//! plain values, or a user-defined module.
//!
//! # Examples
//! ```rust
//! use mkit_container::prelude::*;
//!
//! struct StorageModule;
//!
//! impl Import for StorageModule {
//!     fn definitions(&self) -> Result<Vec<mkit_container::registry::Definition>> {
//!         ContainerBuilder::new()
//!             .lazy("bucket", |_| Ok(String::from("assets")))
//!             .into_definitions()
//!     }
//! }
//!
//! let container = Container::builder()
//!     .import(&StorageModule)
//!     .build()
//!     .and_then(Resolution::ready)
//!     .unwrap();
//!
//! assert_eq!(container.resolve::<String>("bucket").unwrap(), "assets");
//! ```

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::container::{Container, ContainerBuilder};
use crate::error::Result;
use crate::key::{ServiceKey, is_reserved};
use crate::registry::{Definition, FactoryFn, Service};

/// A source of definitions.
///
/// Imported definitions keep their order and kind, and are checked for
/// collisions exactly like local registrations.
pub trait Import {
    /// The definitions to append, in order.
    fn definitions(&self) -> Result<Vec<Definition>>;

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl Import for ContainerBuilder {
    fn definitions(&self) -> Result<Vec<Definition>> {
        if let Some(err) = self.failure() {
            return Err(err.clone());
        }
        Ok(ContainerBuilder::definitions(self).to_vec())
    }
}

/// A built container contributes the definitions it was built from.
///
/// Services are rebuilt inside the importing container, so lazy services
/// stay lazy and see the importing container's other services.
impl Import for Container {
    fn definitions(&self) -> Result<Vec<Definition>> {
        Ok(Container::definitions(self).to_vec())
    }
}

/// Plain, already-built values keyed by name.
///
/// Each entry imports as a lazy service returning the stored value.
/// Reserved names are skipped.
#[derive(Clone, Default)]
pub struct ServiceMap {
    entries: IndexMap<String, (Service, &'static str)>,
}

impl ServiceMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, replacing any previous value under `key`.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        self.entries
            .insert(key.into(), (Arc::new(value), std::any::type_name::<T>()));
        self
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ServiceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl Import for ServiceMap {
    fn definitions(&self) -> Result<Vec<Definition>> {
        let mut definitions = Vec::with_capacity(self.entries.len());

        for (key, (value, type_name)) in &self.entries {
            if is_reserved(key) {
                trace!(key = %key, "Skipping reserved key");
                continue;
            }

            let value = value.clone();
            let factory: FactoryFn = Arc::new(move |_: &Container| -> Result<Service> { Ok(value.clone()) });
            definitions.push(Definition::lazy(ServiceKey::new(key)?, factory, *type_name));
        }

        Ok(definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContainerError;
    use crate::resolution::Resolution;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    struct Named {
        service: String,
    }

    fn named(service: impl Into<String>) -> Named {
        Named {
            service: service.into(),
        }
    }

    fn build(builder: ContainerBuilder) -> Result<Container> {
        builder.build()?.ready()
    }

    #[test]
    fn composes_containers() {
        let a = build(Container::builder().lazy("a", |_| Ok(named("a")))).unwrap();
        let b = build(Container::builder().eager("b", |_| Ok(named("b")))).unwrap();

        let composed = build(Container::builder().import(&a).import(&b)).unwrap();

        assert_eq!(*composed.get::<Named>("a").unwrap(), named("a"));
        assert_eq!(*composed.get::<Named>("b").unwrap(), named("b"));
        assert_eq!(composed.keys(), vec!["a", "b"]);
    }

    #[test]
    fn composition_preserves_laziness() {
        let calls = Arc::new(AtomicU32::new(0));
        let a = build(Container::builder().lazy("a", {
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(named("a"))
            }
        }))
        .unwrap();

        let composed = build(Container::builder().import(&a)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(*composed.get::<Named>("a").unwrap(), named("a"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!a.is_resolved("a"));
    }

    #[test]
    fn importing_a_duplicate_key_fails() {
        let other = build(Container::builder().lazy("a", |_| Ok(named("b")))).unwrap();

        let err = build(
            Container::builder()
                .lazy("a", |_| Ok(named("a")))
                .import(&other),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Service \"a\" is already defined");
    }

    #[test]
    fn local_service_may_depend_on_imported_one() {
        let a = build(Container::builder().lazy("a", |_| Ok(named("a")))).unwrap();

        let b = build(
            Container::builder()
                .import(&a)
                .lazy("b", |c| Ok(named(format!("b depends on {}", c.get::<Named>("a")?.service)))),
        )
        .unwrap();

        assert_eq!(*b.get::<Named>("a").unwrap(), named("a"));
        assert_eq!(*b.get::<Named>("b").unwrap(), named("b depends on a"));
    }

    #[test]
    fn imported_declaration_is_provided_downstream() {
        let a = build(Container::builder().declare("a")).unwrap();
        let b = build(
            Container::builder()
                .import(&a)
                .lazy("b", |c| Ok(named(format!("b depends on {}", c.get::<Named>("a")?.service)))),
        )
        .unwrap();

        assert!(matches!(b.get::<Named>("b"), Err(ContainerError::NotProvided(_))));

        let composed = build(
            Container::builder()
                .import(&b)
                .lazy("a", |_| Ok(named("a"))),
        )
        .unwrap();

        assert_eq!(*composed.get::<Named>("a").unwrap(), named("a"));
        assert_eq!(*composed.get::<Named>("b").unwrap(), named("b depends on a"));
    }

    #[test]
    fn imports_a_builder() {
        let module = ContainerBuilder::new()
            .lazy("x", |_| Ok(1u8))
            .eager("y", |_| Ok(2u8));

        let container = build(Container::builder().import(&module)).unwrap();
        assert_eq!(*container.get::<u8>("x").unwrap(), 1);
        assert_eq!(*container.get::<u8>("y").unwrap(), 2);
    }

    #[test]
    fn importing_a_failed_builder_fails() {
        let module = ContainerBuilder::new().lazy("constructor", |_| Ok(()));

        let err = build(Container::builder().import(&module)).unwrap_err();
        assert!(matches!(err, ContainerError::ReservedKey(ref key) if key == "constructor"));
    }

    #[test]
    fn imports_plain_values_lazily() {
        let values = ServiceMap::new()
            .with("port", 8080u16)
            .with("host", String::from("localhost"))
            .with("toString", String::from("ignored"));
        assert_eq!(values.len(), 3);

        let container = build(
            Container::builder()
                .import(&values)
                .lazy("addr", |c| {
                    Ok(format!("{}:{}", c.get::<String>("host")?, c.get::<u16>("port")?))
                }),
        )
        .unwrap();

        assert_eq!(container.keys(), vec!["port", "host", "addr"]);
        assert_eq!(*container.get::<String>("addr").unwrap(), "localhost:8080");
        assert!(!container.contains("toString"));
    }

    #[test]
    fn plain_value_collides_with_local_definition() {
        let values = ServiceMap::new().with("a", 1u8);
        let err = build(
            Container::builder()
                .eager("a", |_| Ok(0u8))
                .import(&values),
        )
        .unwrap_err();

        assert!(matches!(err, ContainerError::AlreadyDefined(_)));
    }

    #[test]
    fn custom_module_has_name() {
        struct Logging;

        impl Import for Logging {
            fn definitions(&self) -> Result<Vec<Definition>> {
                Ok(Vec::new())
            }
        }

        assert!(Logging.name().contains("Logging"));
        assert!(matches!(
            Container::builder().import(&Logging).build(),
            Ok(Resolution::Ready(ref c)) if c.is_empty()
        ));
    }
}
