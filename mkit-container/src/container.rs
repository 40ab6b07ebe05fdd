//! # The container
//!
//! A registry of named services, each built lazily on first read or eagerly
//! while the container is resolved.
//!
//! # Architecture
//! ```text
//! ContainerBuilder  ──build()──>  Resolution ──(await if pending)──>  Container
//!   declare / lazy / eager / import
//! ```
//!
//! # Examples
//! ```rust
//! use mkit_container::prelude::*;
//!
//! struct Config { url: String }
//! struct Database { url: String }
//!
//! let container = Container::builder()
//!     .eager("config", |_| Ok(Config { url: "postgres://localhost".into() }))
//!     .lazy("database", |c| {
//!         let config = c.get::<Config>("config")?;
//!         Ok(Database { url: config.url.clone() })
//!     })
//!     .build()
//!     .and_then(Resolution::ready)
//!     .expect("Failed to build container");
//!
//! let db = container.get::<Database>("database").expect("Failed to resolve");
//! assert_eq!(db.url, "postgres://localhost");
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use mkit_support::rendering::suggest_similar;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, trace};

use crate::cycle;
use crate::error::{ContainerError, NotRegisteredError, Result};
use crate::import::Import;
use crate::key::ServiceKey;
use crate::registry::{Definition, FactoryFn, Service, erase};
use crate::resolution::{Resolution, Walk};

// ============================================================
// ContainerBuilder
// ============================================================

/// Collects service definitions for a [`Container`].
///
/// Methods take and return the builder so registrations chain. The first
/// invalid registration is remembered and reported by
/// [`build()`](ContainerBuilder::build); registrations after it are ignored.
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .declare("clock")
///     .eager("config", |_| Ok(Config::load()))
///     .lazy("clock", |_| Ok(SystemClock))
///     .import(&other_container)
///     .build()?
///     .await?;
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    definitions: Vec<Definition>,
    error: Option<ContainerError>,
}

impl ContainerBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Declare ──

    /// Reserve `key` for a `lazy` definition registered later.
    ///
    /// Reading the key before it is provided fails with
    /// [`ContainerError::NotProvided`].
    pub fn declare(self, key: &str) -> Self {
        self.register(key, Definition::declared)
    }

    // ── Lazy ──

    /// Register a service built on first read.
    ///
    /// The factory runs at most once; the value is cached afterwards.
    ///
    /// A value that is itself a future is stored and handed back unawaited.
    /// Services must be `Sync`, so such futures are usually wrapped with
    /// `futures::FutureExt::shared`, which also lets every reader await the
    /// same result.
    pub fn lazy<T: Send + Sync + 'static>(
        self,
        key: &str,
        factory: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        let factory = erase(factory);
        self.register(key, |key| Definition::lazy(key, factory, type_name::<T>()))
    }

    // ── Eager ──

    /// Register a service built during resolution, in registration order.
    pub fn eager<T: Send + Sync + 'static>(
        self,
        key: &str,
        factory: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        let factory = erase(factory);
        self.register(key, |key| Definition::eager(key, factory, type_name::<T>()))
    }

    /// Register an eager service whose factory is asynchronous.
    ///
    /// Once resolution reaches this definition, [`build()`](Self::build)
    /// returns [`Resolution::Pending`]; the remaining definitions run after
    /// the future completes.
    #[cfg(feature = "async")]
    pub fn eager_async<T, F, Fut>(self, key: &str, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Container) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<T>> + Send + 'static,
    {
        let factory = crate::registry::erase_async(factory);
        self.register(key, |key| Definition::eager_async(key, factory, type_name::<T>()))
    }

    // ── Import ──

    /// Append every definition of `source`, keeping their order and kinds.
    ///
    /// Collisions with keys seen so far are reported by `build()` exactly as
    /// for local registrations.
    pub fn import(mut self, source: &dyn Import) -> Self {
        if self.error.is_some() {
            return self;
        }

        match source.definitions() {
            Ok(definitions) => {
                debug!(
                    source = source.name(),
                    count = definitions.len(),
                    provided = definitions.iter().filter(|d| d.kind().provides_value()).count(),
                    "Imported definitions"
                );
                self.definitions.extend(definitions);
            }
            Err(err) => self.error = Some(err),
        }
        self
    }

    // ── Build ──

    /// Resolve the definitions into a container.
    ///
    /// Runs eager factories in registration order. Returns
    /// [`Resolution::Ready`] unless an asynchronous eager factory was reached.
    ///
    /// # Errors
    /// The first registration error, or the first definition that fails
    /// validation or whose eager factory fails.
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Result<Resolution> {
        if let Some(err) = self.error {
            return Err(err);
        }

        info!(definitions = self.definitions.len(), "Building container");
        Walk::new(self.definitions).run()
    }

    /// Definitions registered so far.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Consume the builder, yielding its definitions.
    ///
    /// # Errors
    /// The first registration error, if any.
    pub fn into_definitions(self) -> Result<Vec<Definition>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.definitions),
        }
    }

    // ── Internal ──

    pub(crate) fn failure(&self) -> Option<&ContainerError> {
        self.error.as_ref()
    }

    fn register(mut self, key: &str, define: impl FnOnce(ServiceKey) -> Definition) -> Self {
        if self.error.is_some() {
            return self;
        }

        match ServiceKey::new(key) {
            Ok(key) => {
                let definition = define(key);
                let kind = definition.kind();
                debug!(key = %definition.key, %kind, deferred = kind.is_deferred(), "Registered service");
                self.definitions.push(definition);
            }
            Err(err) => self.error = Some(err),
        }
        self
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("definitions", &self.definitions.len())
            .field("failed", &self.error.is_some())
            .finish()
    }
}

/// Configure a builder and resolve it.
///
/// ```rust
/// use mkit_container::container::make_container;
///
/// let container = make_container(|b| b
///     .lazy("a", |_| Ok(1u32))
///     .lazy("b", |c| Ok(*c.get::<u32>("a")? + 1)))
///     .unwrap()
///     .ready()
///     .unwrap();
///
/// assert_eq!(*container.get::<u32>("b").unwrap(), 2);
/// ```
pub fn make_container(configure: impl FnOnce(ContainerBuilder) -> ContainerBuilder) -> Result<Resolution> {
    configure(ContainerBuilder::new()).build()
}

// ═══════════════════════════════════════════
// Slots
// ═══════════════════════════════════════════

pub(crate) enum Slot {
    Declared,
    Lazy { factory: FactoryFn, cell: OnceCell<Service> },
    Ready(Service),
}

impl Slot {
    pub(crate) fn lazy(factory: FactoryFn) -> Self {
        Slot::Lazy {
            factory,
            cell: OnceCell::new(),
        }
    }

    fn is_resolved(&self) -> bool {
        match self {
            Slot::Declared => false,
            Slot::Lazy { cell, .. } => cell.get().is_some(),
            Slot::Ready(_) => true,
        }
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

struct Inner {
    id: u64,
    slots: RwLock<IndexMap<ServiceKey, Arc<Slot>>>,
    definitions: Vec<Definition>,
}

/// A resolved set of services, looked up by key.
///
/// Cloning is cheap and yields a handle to the same services. Keys are fixed
/// once resolution completes; lazy services are built on first read.
#[derive(Clone)]
pub struct Container {
    inner: Arc<Inner>,
}

impl Container {
    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn with_definitions(definitions: Vec<Definition>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                slots: RwLock::new(IndexMap::new()),
                definitions,
            }),
        }
    }

    pub(crate) fn install(&self, key: ServiceKey, slot: Slot) {
        trace!(key = %key, "Installing slot");
        self.inner.slots.write().insert(key, Arc::new(slot));
    }

    /// Read a service as a type-erased value.
    ///
    /// # Errors
    /// - [`ContainerError::NotRegistered`]: unknown key
    /// - [`ContainerError::NotProvided`]: declared but never provided
    /// - [`ContainerError::CircularDependency`]: lazy factories loop
    /// - any error raised by the service's lazy factory
    pub fn get_value(&self, key: &str) -> Result<Service> {
        trace!(key, "Resolving");

        let entry = self
            .inner
            .slots
            .read()
            .get_key_value(key)
            .map(|(key, slot)| (key.clone(), slot.clone()));
        let Some((key, slot)) = entry else {
            return Err(self.not_registered(key));
        };

        match &*slot {
            Slot::Declared => Err(ContainerError::NotProvided(key.to_string())),
            Slot::Ready(value) => Ok(value.clone()),
            Slot::Lazy { factory, cell } => {
                if let Some(value) = cell.get() {
                    return Ok(value.clone());
                }

                let _guard = cycle::enter(self.inner.id, &key)?;
                cell.get_or_try_init(|| {
                    debug!(key = %key, "Building lazy service");
                    factory(self)
                })
                .cloned()
            }
        }
    }

    /// Read a service as `Arc<T>`.
    ///
    /// ```rust,ignore
    /// let db: Arc<Database> = container.get("database")?;
    /// ```
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        self.get_value(key)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Read a service and clone it out.
    pub fn resolve<T: Any + Clone + Send + Sync>(&self, key: &str) -> Result<T> {
        self.get::<T>(key).map(|value| T::clone(&value))
    }

    /// `true` if `key` was declared or defined.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.slots.read().contains_key(key)
    }

    /// `true` if `key` holds a value without running any factory.
    pub fn is_resolved(&self, key: &str) -> bool {
        self.inner
            .slots
            .read()
            .get(key)
            .is_some_and(|slot| slot.is_resolved())
    }

    /// All keys, in first-registration order.
    pub fn keys(&self) -> Vec<String> {
        self.inner
            .slots
            .read()
            .keys()
            .map(|key| key.to_string())
            .collect()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.inner.slots.read().len()
    }

    /// `true` if the container has no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.slots.read().is_empty()
    }

    /// The definitions this container was built from.
    pub fn definitions(&self) -> &[Definition] {
        &self.inner.definitions
    }

    fn not_registered(&self, key: &str) -> ContainerError {
        let slots = self.inner.slots.read();
        let available: Vec<&str> = slots.keys().map(|k| k.as_str()).collect();

        ContainerError::NotRegistered(NotRegisteredError {
            requested: key.to_string(),
            suggestions: suggest_similar(key, &available, 3),
        })
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("keys", &self.keys())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder, make_container};
    pub use crate::error::{ContainerError, Result};
    pub use crate::import::{Import, ServiceMap};
    pub use crate::key::ServiceKey;
    pub use crate::kind::ServiceKind;
    pub use crate::resolution::Resolution;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
