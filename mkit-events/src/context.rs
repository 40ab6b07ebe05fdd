//! Scoped values.
//!
//! A [`Context`] describes how to build a value from a config. Each
//! [`Scope`] created by [`Context::provide`] builds that value at most once,
//! and while a scope is entered, [`Context::current`] on the same thread
//! returns its value. Nested scopes shadow outer ones.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use tracing::trace;

use crate::bus::EventBus;
use crate::error::{Result, ScopeError};

type Erased = Arc<dyn Any + Send + Sync>;
type Init<V, C> = Arc<dyn Fn(C) -> V + Send + Sync>;

static NEXT_CONTEXT: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static ENTERED: RefCell<Vec<(u64, Erased)>> = const { RefCell::new(Vec::new()) };
}

/// Factory for scoped values of type `V` configured by `C`.
pub struct Context<V, C = ()> {
    id: u64,
    init: Init<V, C>,
}

impl<V, C> Context<V, C>
where
    V: Send + Sync + 'static,
    C: Send + 'static,
{
    pub fn new<F>(init: F) -> Self
    where
        F: Fn(C) -> V + Send + Sync + 'static,
    {
        Self {
            id: NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed),
            init: Arc::new(init),
        }
    }

    /// Creates a scope whose value is built from `config` on first use.
    pub fn provide(&self, config: C) -> Scope<V> {
        let init = Arc::clone(&self.init);
        let context = self.id;
        Scope {
            context,
            value: Lazy::new(Box::new(move || {
                trace!(context, "Initializing scoped value");
                Arc::new(init(config))
            })),
        }
    }

    /// Value of the innermost entered scope of this context.
    ///
    /// # Errors
    ///
    /// [`ScopeError::NotFound`] when no such scope is entered on this thread.
    pub fn current(&self) -> Result<Arc<V>> {
        let erased = ENTERED
            .with(|entered| {
                entered
                    .borrow()
                    .iter()
                    .rev()
                    .find(|(context, _)| *context == self.id)
                    .map(|(_, value)| Arc::clone(value))
            })
            .ok_or(ScopeError::NotFound)?;

        // Only this context pushes values under its id.
        erased.downcast::<V>().map_err(|_| ScopeError::NotFound)
    }
}

impl<V, C> Clone for Context<V, C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            init: Arc::clone(&self.init),
        }
    }
}

impl<V, C> fmt::Debug for Context<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("id", &self.id).finish()
    }
}

/// One provided instance of a [`Context`].
pub struct Scope<V> {
    context: u64,
    value: Lazy<Arc<V>, Box<dyn FnOnce() -> Arc<V> + Send>>,
}

impl<V> Scope<V>
where
    V: Send + Sync + 'static,
{
    /// The scope's value, built on the first call.
    pub fn value(&self) -> Arc<V> {
        Arc::clone(Lazy::force(&self.value))
    }

    /// Runs `body` with this scope visible to [`Context::current`].
    pub fn enter<R>(&self, body: impl FnOnce() -> R) -> R {
        let value: Erased = self.value();
        ENTERED.with(|entered| entered.borrow_mut().push((self.context, value)));
        let _exit = ExitGuard;
        body()
    }
}

impl<V> fmt::Debug for Scope<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("context", &self.context)
            .field("initialized", &Lazy::get(&self.value).is_some())
            .finish()
    }
}

struct ExitGuard;

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let _ = ENTERED.try_with(|entered| entered.borrow_mut().pop());
    }
}

impl EventBus {
    /// A context that gives every scope its own [`EventBus`].
    pub fn context() -> Context<EventBus> {
        Context::new(|()| EventBus::new())
    }
}
