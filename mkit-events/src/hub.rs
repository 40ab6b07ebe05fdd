//! Typed single-event hub with subscription handles.

use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use mkit_support::rendering::shorten_type_name;
use tracing::trace;

use crate::target::{EventTarget, ListenerId};

type Validator<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Dispatches and subscribes to one named event carrying a `T` payload.
///
/// Subscribers only see payloads that pass the optional validator.
///
/// ```
/// use mkit_events::EventHub;
///
/// let hub = EventHub::<u32>::new("tick").with_validator(|n| n % 2 == 0);
/// let subscription = hub.subscribe(|n| println!("even tick {n}"));
/// hub.dispatch(2);
/// hub.dispatch(3);
/// drop(subscription);
/// ```
pub struct EventHub<T> {
    event: Arc<str>,
    target: EventTarget,
    validator: Option<Validator<T>>,
    _payload: PhantomData<fn(T)>,
}

impl<T> EventHub<T>
where
    T: Any + Send + Sync,
{
    /// Creates a hub on its own private target.
    pub fn new(event: &str) -> Self {
        Self::on(event, &EventTarget::new())
    }

    /// Creates a hub that dispatches `event` on a shared target.
    pub fn on(event: &str, target: &EventTarget) -> Self {
        Self {
            event: Arc::from(event),
            target: target.clone(),
            validator: None,
            _payload: PhantomData,
        }
    }

    /// Only deliver payloads for which `validator` returns `true`.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn target(&self) -> &EventTarget {
        &self.target
    }

    /// Dispatches `detail` and returns the number of listeners invoked.
    pub fn dispatch(&self, detail: T) -> usize {
        self.dispatch_ref(&detail)
    }

    /// Like [`dispatch`](Self::dispatch) but leaves the payload with the caller.
    pub fn dispatch_ref(&self, detail: &T) -> usize {
        self.target.dispatch(&self.event, detail)
    }

    /// Calls `callback` for every valid payload until the handle is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let validator = self.validator.clone();
        let event = Arc::clone(&self.event);
        let id = self.target.add_listener(&self.event, move |payload| {
            let Some(detail) = payload.downcast_ref::<T>() else {
                trace!(event = &*event, expected = type_name::<T>(), "Payload type mismatch, skipped");
                return;
            };
            if let Some(validator) = &validator {
                if !validator(detail) {
                    trace!(event = &*event, "Payload rejected by validator");
                    return;
                }
            }
            callback(detail);
        });

        Subscription {
            target: self.target.clone(),
            event: Arc::clone(&self.event),
            id: Some(id),
        }
    }
}

impl<T> Clone for EventHub<T> {
    fn clone(&self) -> Self {
        Self {
            event: Arc::clone(&self.event),
            target: self.target.clone(),
            validator: self.validator.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> fmt::Debug for EventHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("event", &self.event)
            .field("payload", &shorten_type_name(type_name::<T>()))
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    target: EventTarget,
    event: Arc<str>,
    id: Option<ListenerId>,
}

impl Subscription {
    /// Unsubscribes now. Returns `false` if the listener was already gone.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    /// Keeps the listener registered for the lifetime of its target.
    pub fn detach(mut self) {
        self.id = None;
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    fn release(&mut self) -> bool {
        match self.id.take() {
            Some(id) => self.target.remove_listener(&self.event, id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish()
    }
}
