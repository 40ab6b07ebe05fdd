//! Service definitions: the ordered record of what was registered.
//!
//! A [`Definition`] pairs a [`ServiceKey`] with the factory that produces
//! its value. Definitions are consumed, in order, by the resolution pass.

use std::any::Any;
use std::sync::Arc;

#[cfg(feature = "async")]
use futures::future::BoxFuture;

use crate::container::Container;
use crate::error::Result;
use crate::key::ServiceKey;
use crate::kind::ServiceKind;

/// A type-erased service value.
pub type Service = Arc<dyn Any + Send + Sync>;

/// Factory for lazy and synchronous eager services.
///
/// Receives the container so it can read other services.
pub type FactoryFn = Arc<dyn Fn(&Container) -> Result<Service> + Send + Sync>;

/// Factory for asynchronous eager services.
///
/// Receives a handle to the container; the future may outlive the call.
#[cfg(feature = "async")]
pub type AsyncFactoryFn = Arc<dyn Fn(Container) -> BoxFuture<'static, Result<Service>> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Producer {
    Declared,
    Lazy(FactoryFn),
    Eager(FactoryFn),
    #[cfg(feature = "async")]
    EagerAsync(AsyncFactoryFn),
}

/// One registration, in registration order.
#[derive(Clone)]
pub struct Definition {
    pub(crate) key: ServiceKey,
    pub(crate) producer: Producer,
    pub(crate) type_name: Option<&'static str>,
}

impl Definition {
    pub(crate) fn declared(key: ServiceKey) -> Self {
        Self {
            key,
            producer: Producer::Declared,
            type_name: None,
        }
    }

    pub(crate) fn lazy(key: ServiceKey, factory: FactoryFn, type_name: &'static str) -> Self {
        Self {
            key,
            producer: Producer::Lazy(factory),
            type_name: Some(type_name),
        }
    }

    pub(crate) fn eager(key: ServiceKey, factory: FactoryFn, type_name: &'static str) -> Self {
        Self {
            key,
            producer: Producer::Eager(factory),
            type_name: Some(type_name),
        }
    }

    #[cfg(feature = "async")]
    pub(crate) fn eager_async(key: ServiceKey, factory: AsyncFactoryFn, type_name: &'static str) -> Self {
        Self {
            key,
            producer: Producer::EagerAsync(factory),
            type_name: Some(type_name),
        }
    }

    /// The service key.
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// How the value is produced.
    pub fn kind(&self) -> ServiceKind {
        match self.producer {
            Producer::Declared => ServiceKind::Declare,
            Producer::Lazy(_) => ServiceKind::Lazy,
            Producer::Eager(_) => ServiceKind::Eager,
            #[cfg(feature = "async")]
            Producer::EagerAsync(_) => ServiceKind::Eager,
        }
    }

    /// `true` for eager definitions whose factory returns a future.
    pub fn is_async(&self) -> bool {
        match self.producer {
            #[cfg(feature = "async")]
            Producer::EagerAsync(_) => true,
            _ => false,
        }
    }

    /// Name of the produced type; `None` for declarations.
    pub fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("key", &self.key)
            .field("kind", &self.kind())
            .field("deferred", &self.kind().is_deferred())
            .field("async", &self.is_async())
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Erases a typed factory into a [`FactoryFn`].
pub(crate) fn erase<T, F>(factory: F) -> FactoryFn
where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
{
    Arc::new(move |container: &Container| Ok(Arc::new(factory(container)?) as Service))
}

#[cfg(feature = "async")]
pub(crate) fn erase_async<T, F, Fut>(factory: F) -> AsyncFactoryFn
where
    T: Send + Sync + 'static,
    F: Fn(Container) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<T>> + Send + 'static,
{
    use futures::FutureExt;

    Arc::new(move |container: Container| {
        factory(container)
            .map(|value| value.map(|v| Arc::new(v) as Service))
            .boxed()
    })
}
