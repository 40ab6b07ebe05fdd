//! Named-event listener registry.
//!
//! An [`EventTarget`] maps event names to ordered listener lists. Payloads
//! travel as `&dyn Any`; typed access lives in [`EventHub`](crate::hub::EventHub).

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::{debug, trace};

type Listener = Arc<dyn Fn(&dyn Any) + Send + Sync>;

static NEXT_LISTENER: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`EventTarget::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        ListenerId(NEXT_LISTENER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A cloneable, thread-safe registry of listeners keyed by event name.
///
/// Clones share the same listeners.
#[derive(Clone, Default)]
pub struct EventTarget {
    listeners: Arc<DashMap<String, Vec<(ListenerId, Listener)>>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `event`. Listeners run in registration order.
    pub fn add_listener<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&dyn Any) + Send + Sync + 'static,
    {
        let id = ListenerId::next();
        self.listeners
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(listener)));
        trace!(event, ?id, "Listener added");
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let removed = match self.listeners.get_mut(event) {
            Some(mut listeners) => {
                let before = listeners.len();
                listeners.retain(|(existing, _)| *existing != id);
                listeners.len() != before
            }
            None => false,
        };
        // Empty lists are dropped so `event_names` stays meaningful.
        self.listeners.remove_if(event, |_, listeners| listeners.is_empty());
        trace!(event, ?id, removed, "Listener removed");
        removed
    }

    /// Calls every listener of `event` with `payload` and returns how many ran.
    ///
    /// The listener list is snapshotted first: listeners added or removed by
    /// a running listener take effect on the next dispatch.
    pub fn dispatch(&self, event: &str, payload: &dyn Any) -> usize {
        let snapshot: Vec<Listener> = match self.listeners.get(event) {
            Some(listeners) => listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            None => Vec::new(),
        };

        debug!(event, listeners = snapshot.len(), "Dispatching event");
        for listener in &snapshot {
            listener(payload);
        }
        snapshot.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, |l| l.len())
    }

    /// Names of events with at least one listener, in no particular order.
    pub fn event_names(&self) -> Vec<String> {
        self.listeners.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for entry in self.listeners.iter() {
            map.entry(entry.key(), &entry.value().len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn dispatch_reaches_listeners_in_order() {
        let target = EventTarget::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            target.add_listener("ping", move |payload| {
                let n = payload.downcast_ref::<i32>().copied().unwrap_or_default();
                seen.lock().push(format!("{tag}:{n}"));
            });
        }

        assert_eq!(target.dispatch("ping", &7i32), 2);
        assert_eq!(*seen.lock(), vec!["first:7", "second:7"]);
    }

    #[test]
    fn dispatch_without_listeners_is_noop() {
        let target = EventTarget::new();
        assert_eq!(target.dispatch("nothing", &()), 0);
    }

    #[test]
    fn events_are_isolated_by_name() {
        let target = EventTarget::new();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        target.add_listener("a", move |_| *counter.lock() += 1);

        target.dispatch("b", &());
        assert_eq!(*hits.lock(), 0);
        target.dispatch("a", &());
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let target = EventTarget::new();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let id = target.add_listener("a", move |_| *counter.lock() += 1);

        assert!(target.remove_listener("a", id));
        assert!(!target.remove_listener("a", id));
        target.dispatch("a", &());

        assert_eq!(*hits.lock(), 0);
        assert_eq!(target.listener_count("a"), 0);
        assert!(target.event_names().is_empty());
    }

    #[test]
    fn listener_added_during_dispatch_waits_for_next_one() {
        let target = EventTarget::new();
        let hits = Arc::new(Mutex::new(0));

        let inner_target = target.clone();
        let inner_hits = Arc::clone(&hits);
        target.add_listener("a", move |_| {
            let hits = Arc::clone(&inner_hits);
            inner_target.add_listener("a", move |_| *hits.lock() += 1);
        });

        assert_eq!(target.dispatch("a", &()), 1);
        assert_eq!(*hits.lock(), 0);
        assert_eq!(target.listener_count("a"), 2);
    }

    #[test]
    fn clones_share_listeners() {
        let target = EventTarget::new();
        let clone = target.clone();
        target.add_listener("a", |_| {});
        assert_eq!(clone.listener_count("a"), 1);
    }
}
