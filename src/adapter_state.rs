//! Adapter power-change notifications.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use async_lock::Mutex;
use log::debug;

/// Registration key of an [AdapterStateObserver].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

impl ObserverId {
    /// Allocates a process-wide unique id.
    pub fn next() -> Self {
        static NEXT_OBSERVER_ID: AtomicUsize = AtomicUsize::new(0);
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::SeqCst))
    }
}

/// Receives Bluetooth adapter on/off transitions.
pub trait AdapterStateObserver: Send + Sync {
    fn on_adapter_state_changed(&self, enabled: bool);
}

/// Delivers adapter power changes to any number of observers.
///
/// Registering an id twice replaces the first registration; unregistering an unknown
/// id does nothing. Observers are held weakly.
pub trait AdapterStateNotifier: Send + Sync {
    /// Current power state of the adapter.
    fn is_enabled(&self) -> bool;
    fn register(&self, id: ObserverId, observer: Weak<dyn AdapterStateObserver>);
    fn unregister(&self, id: ObserverId);
}

/// In-process [AdapterStateNotifier] driven by [AdapterStateBroadcaster::set_enabled].
pub struct AdapterStateBroadcaster {
    enabled: AtomicBool,
    observers: Mutex<Vec<(ObserverId, Weak<dyn AdapterStateObserver>)>>,
}

impl AdapterStateBroadcaster {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Records the new power state and delivers it to every live observer.
    ///
    /// Every call is delivered, including repeated values. Observers are called
    /// without the registry lock held, so they may register or unregister from
    /// inside the callback. Calls should come from a single thread to keep the
    /// delivery order.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        let observers: Vec<Arc<dyn AdapterStateObserver>> = {
            let mut guard = self.observers.lock_blocking();
            guard.retain(|(_, observer)| observer.strong_count() > 0);
            guard.iter().filter_map(|(_, observer)| observer.upgrade()).collect()
        };
        debug!(
            "adapter {} delivered to {} observers",
            if enabled { "on" } else { "off" },
            observers.len()
        );
        for observer in observers {
            observer.on_adapter_state_changed(enabled);
        }
    }

    /// Number of registered observers that are still alive.
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock_blocking()
            .iter()
            .filter(|(_, observer)| observer.strong_count() > 0)
            .count()
    }
}

impl Default for AdapterStateBroadcaster {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AdapterStateNotifier for AdapterStateBroadcaster {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn register(&self, id: ObserverId, observer: Weak<dyn AdapterStateObserver>) {
        let mut guard = self.observers.lock_blocking();
        if let Some(entry) = guard.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            entry.1 = observer;
        } else {
            guard.push((id, observer));
        }
    }

    fn unregister(&self, id: ObserverId) {
        self.observers
            .lock_blocking()
            .retain(|(entry_id, _)| *entry_id != id);
    }
}
