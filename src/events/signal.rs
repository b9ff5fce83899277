//! Single-threaded publish/subscribe hub with persistent and fire-once
//! listeners.
//!
//! A `Signal<T>` is owned by whoever is allowed to fire it; everyone else
//! gets a [`SignalSubscriber`] view, which can register and remove listeners
//! but cannot `send`. Listener identity is a [`ListenerKey`] rather than a
//! function pointer, so re-subscribing under the same key replaces the old
//! listener instead of duplicating it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a persistent listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(u64);

impl ListenerKey {
    /// A fresh process-unique key
    pub fn unique() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type PersistentFn<T> = Box<dyn FnMut(&T)>;
type OnceFn<T> = Box<dyn FnOnce(&T)>;

/// Publish/subscribe hub for values of type `T`
pub struct Signal<T> {
    listeners: Vec<(ListenerKey, PersistentFn<T>)>,
    once: Vec<OnceFn<T>>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            once: Vec::new(),
        }
    }

    /// Register a persistent listener under `key`
    ///
    /// Re-subscribing an existing key replaces the previous listener, so
    /// repeated registration is idempotent rather than duplicating calls.
    pub fn subscribe(&mut self, key: ListenerKey, listener: impl FnMut(&T) + 'static) {
        let boxed: PersistentFn<T> = Box::new(listener);
        if let Some(slot) = self.listeners.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = boxed;
        } else {
            self.listeners.push((key, boxed));
        }
    }

    /// Register a listener removed automatically after its first invocation
    pub fn once(&mut self, listener: impl FnOnce(&T) + 'static) {
        self.once.push(Box::new(listener));
    }

    /// Remove a persistent listener; returns whether one was registered
    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(k, _)| *k != key);
        self.listeners.len() != before
    }

    /// Drop every listener, persistent and once
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.once.clear();
    }

    /// Invoke all persistent listeners, then all once listeners, then drain
    /// the once set. Every listener runs exactly once per send.
    pub fn send(&mut self, value: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
        for listener in self.once.drain(..) {
            listener(value);
        }
    }

    /// Subscribe-only view for non-owning consumers
    pub fn subscriber(&mut self) -> SignalSubscriber<'_, T> {
        SignalSubscriber(self)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len() + self.once.len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability to register and remove listeners without the ability to fire
/// the signal.
pub struct SignalSubscriber<'a, T>(&'a mut Signal<T>);

impl<'a, T> SignalSubscriber<'a, T> {
    pub fn subscribe(&mut self, key: ListenerKey, listener: impl FnMut(&T) + 'static) {
        self.0.subscribe(key, listener);
    }

    pub fn once(&mut self, listener: impl FnOnce(&T) + 'static) {
        self.0.once(listener);
    }

    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        self.0.unsubscribe(key)
    }
}
