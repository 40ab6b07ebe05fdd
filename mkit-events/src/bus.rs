//! Type-keyed event bus.
//!
//! Each payload type gets its own [`EventHub`], created on first use and
//! named after the type. All hubs share one [`EventTarget`].

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use anymap2::SendSyncAnyMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::hub::{EventHub, Subscription};
use crate::target::EventTarget;

/// A cloneable bus dispatching events by payload type.
///
/// ```
/// use mkit_events::EventBus;
///
/// #[derive(Debug)]
/// struct Saved { id: u32 }
///
/// let bus = EventBus::new();
/// let _sub = bus.subscribe(|saved: &Saved| println!("saved {}", saved.id));
/// assert_eq!(bus.dispatch(Saved { id: 7 }), 1);
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    target: EventTarget,
    hubs: Arc<Mutex<SendSyncAnyMap>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            target: EventTarget::new(),
            hubs: Arc::new(Mutex::new(SendSyncAnyMap::new())),
        }
    }

    /// Returns the hub for payload type `E`, creating it on first use.
    pub fn hub<E: Any + Send + Sync>(&self) -> EventHub<E> {
        let mut hubs = self.hubs.lock();
        if let Some(hub) = hubs.get::<EventHub<E>>() {
            return hub.clone();
        }

        debug!(event = type_name::<E>(), "Creating event hub");
        let hub = EventHub::on(type_name::<E>(), &self.target);
        hubs.insert(hub.clone());
        hub
    }

    /// Installs a validator for payloads of type `E`.
    ///
    /// Applies to subscriptions made afterwards.
    pub fn set_validator<E, F>(&self, validator: F)
    where
        E: Any + Send + Sync,
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let hub = self.hub::<E>().with_validator(validator);
        self.hubs.lock().insert(hub);
    }

    pub fn dispatch<E: Any + Send + Sync>(&self, event: E) -> usize {
        self.hub::<E>().dispatch(event)
    }

    pub fn subscribe<E, F>(&self, callback: F) -> Subscription
    where
        E: Any + Send + Sync,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.hub::<E>().subscribe(callback)
    }

    pub fn target(&self) -> &EventTarget {
        &self.target
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus").field("target", &self.target).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Login(String);

    #[derive(Debug, Clone, PartialEq)]
    struct Logout(String);

    #[test]
    fn routes_by_payload_type() {
        let bus = EventBus::new();
        let logins = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&logins);
        let _sub = bus.subscribe(move |e: &Login| sink.lock().push(e.clone()));

        assert_eq!(bus.dispatch(Logout("ana".into())), 0);
        assert_eq!(bus.dispatch(Login("ana".into())), 1);
        assert_eq!(*logins.lock(), vec![Login("ana".into())]);
    }

    #[test]
    fn hub_is_created_once() {
        let bus = EventBus::new();
        let first = bus.hub::<Login>();
        let _sub = first.subscribe(|_| {});

        assert_eq!(bus.hub::<Login>().target().listener_count(first.event()), 1);
        assert_eq!(first.event(), type_name::<Login>());
    }

    #[test]
    fn validator_applies_to_later_subscriptions() {
        let bus = EventBus::new();
        bus.set_validator(|e: &Login| !e.0.is_empty());

        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let _sub = bus.subscribe(move |_: &Login| *counter.lock() += 1);

        bus.dispatch(Login(String::new()));
        bus.dispatch(Login("bo".into()));
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn clones_share_hubs() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let _sub = bus.subscribe(move |_: &Logout| *counter.lock() += 1);

        clone.dispatch(Logout("x".into()));
        assert_eq!(*hits.lock(), 1);
    }
}
