//! The resolution pass: turns an ordered definition list into a container.
//!
//! Definitions are processed strictly front-to-back. Synchronous steps run
//! in place; the first asynchronous eager step suspends the walk and the
//! remaining definitions are chained after its future, so the overall result
//! becomes [`Resolution::Pending`].

use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "async")]
use futures::FutureExt;
#[cfg(feature = "async")]
use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::container::{Container, Slot};
use crate::error::{ContainerError, Result};
use crate::key::ServiceKey;
use crate::registry::{Definition, Producer};
#[cfg(feature = "async")]
use crate::registry::Service;

/// The outcome of [`ContainerBuilder::build`](crate::container::ContainerBuilder::build).
pub enum Resolution {
    /// Every eager service was synchronous; the container is complete.
    Ready(Container),

    /// An eager service is asynchronous; await to finish resolution.
    #[cfg(feature = "async")]
    Pending(BoxFuture<'static, Result<Container>>),
}

impl Resolution {
    /// `true` while an asynchronous eager service is outstanding.
    pub fn is_pending(&self) -> bool {
        match self {
            Resolution::Ready(_) => false,
            #[cfg(feature = "async")]
            Resolution::Pending(_) => true,
        }
    }

    /// The container, if resolution finished synchronously.
    ///
    /// # Errors
    /// [`ContainerError::PendingResolution`] if resolution is asynchronous.
    pub fn ready(self) -> Result<Container> {
        match self {
            Resolution::Ready(container) => Ok(container),
            #[cfg(feature = "async")]
            Resolution::Pending(_) => Err(ContainerError::PendingResolution),
        }
    }

    /// Waits for resolution to finish, whichever way it went.
    #[cfg(feature = "async")]
    pub async fn into_container(self) -> Result<Container> {
        match self {
            Resolution::Ready(container) => Ok(container),
            Resolution::Pending(pending) => pending.await,
        }
    }
}

#[cfg(feature = "async")]
impl std::future::IntoFuture for Resolution {
    type Output = Result<Container>;
    type IntoFuture = BoxFuture<'static, Result<Container>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Resolution::Ready(container) => futures::future::ready(Ok(container)).boxed(),
            Resolution::Pending(pending) => pending,
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Ready(container) => f.debug_tuple("Ready").field(container).finish(),
            #[cfg(feature = "async")]
            Resolution::Pending(_) => f.write_str("Pending"),
        }
    }
}

enum Step {
    Continue,
    #[cfg(feature = "async")]
    Suspend(ServiceKey, BoxFuture<'static, Result<Service>>),
}

/// State carried across the walk, including across suspensions.
pub(crate) struct Walk {
    container: Container,
    remaining: std::vec::IntoIter<Definition>,
    defined: HashSet<ServiceKey>,
    declared: HashSet<ServiceKey>,
}

impl Walk {
    pub(crate) fn new(definitions: Vec<Definition>) -> Self {
        Self {
            container: Container::with_definitions(definitions.clone()),
            remaining: definitions.into_iter(),
            defined: HashSet::new(),
            declared: HashSet::new(),
        }
    }

    /// Processes the remaining definitions.
    pub(crate) fn run(mut self) -> Result<Resolution> {
        while let Some(definition) = self.remaining.next() {
            match self.step(definition)? {
                Step::Continue => {}
                #[cfg(feature = "async")]
                Step::Suspend(key, pending) => {
                    debug!(key = %key, "Waiting for asynchronous eager service");
                    return Ok(Resolution::Pending(
                        async move {
                            let value = pending.await?;
                            self.container.install(key, Slot::Ready(value));
                            self.run()?.await
                        }
                        .boxed(),
                    ));
                }
            }
        }

        info!(services = self.container.len(), "Container resolved ✓");
        Ok(Resolution::Ready(self.container))
    }

    fn step(&mut self, definition: Definition) -> Result<Step> {
        let Definition { key, producer, .. } = definition;

        if self.defined.contains(&key) {
            return Err(ContainerError::AlreadyDefined(key.to_string()));
        }

        match producer {
            Producer::Declared => {
                if !self.declared.insert(key.clone()) {
                    return Err(ContainerError::AlreadyDeclared(key.to_string()));
                }
                self.container.install(key, Slot::Declared);
            }
            Producer::Lazy(factory) => {
                self.declared.remove(&key);
                self.defined.insert(key.clone());
                self.container.install(key, Slot::lazy(factory));
            }
            Producer::Eager(factory) => {
                self.begin_eager(&key)?;
                let value = factory(&self.container)?;
                self.container.install(key, Slot::Ready(value));
            }
            #[cfg(feature = "async")]
            Producer::EagerAsync(factory) => {
                self.begin_eager(&key)?;
                let pending = factory(self.container.clone());
                return Ok(Step::Suspend(key, pending));
            }
        }

        Ok(Step::Continue)
    }

    fn begin_eager(&mut self, key: &ServiceKey) -> Result<()> {
        if self.declared.contains(key) {
            return Err(ContainerError::DeclaredCannotBeEager(key.to_string()));
        }
        debug!(key = %key, "Building eager service");
        self.defined.insert(key.clone());
        Ok(())
    }
}
