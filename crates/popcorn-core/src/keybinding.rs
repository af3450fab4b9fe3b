//! Global key bindings with scoped lifetimes.
//!
//! A [`KeyBinding`] guard keeps its callback installed in the shared
//! [`KeyBindings`] registry until the guard is dropped. Each guard owns
//! exactly one registry slot, so repeated activations never stack up
//! duplicate listeners.

use std::sync::{Arc, Mutex, Weak};

type Callback<T> = Arc<dyn Fn() -> T + Send + Sync>;

struct Slot<T> {
    id: u64,
    key: String,
    callback: Callback<T>,
}

struct Registry<T> {
    next_id: u64,
    slots: Vec<Slot<T>>,
}

impl<T> Registry<T> {
    fn install(&mut self, key: &str, callback: Callback<T>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.slots.push(Slot {
            id,
            key: normalize(key),
            callback,
        });
        id
    }

    fn uninstall(&mut self, id: u64) {
        self.slots.retain(|slot| slot.id != id);
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Shared registry of key bindings. Callbacks return a `T` (for example a
/// UI message) that [`dispatch`](Self::dispatch) hands back to the caller.
pub struct KeyBindings<T = ()> {
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for KeyBindings<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for KeyBindings<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyBindings<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    /// Install `callback` for `key` (matched case-insensitively) until the
    /// returned guard is dropped.
    pub fn bind<F>(&self, key: &str, callback: F) -> KeyBinding<T>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = self
            .inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .install(key, Arc::new(callback));
        tracing::trace!(key, id, "key binding installed");
        KeyBinding {
            id,
            key: key.to_string(),
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Run every callback bound to `key` and collect what they return.
    ///
    /// Callbacks run after the registry lock is released, so they may bind
    /// or drop bindings themselves.
    pub fn dispatch(&self, key: &str) -> Vec<T> {
        let key = normalize(key);
        let matched: Vec<Callback<T>> = {
            let registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            registry
                .slots
                .iter()
                .filter(|slot| slot.key == key)
                .map(|slot| Arc::clone(&slot.callback))
                .collect()
        };
        matched.iter().map(|callback| callback()).collect()
    }

    /// Number of installed bindings.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .slots
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guard for one installed binding.
pub struct KeyBinding<T> {
    id: u64,
    key: String,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> KeyBinding<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Swap in a new key and callback. The old listener is removed and the
    /// new one installed in a single step.
    pub fn rebind<F>(&mut self, key: &str, callback: F)
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.uninstall(self.id);
        self.id = registry.install(key, Arc::new(callback));
        self.key = key.to_string();
    }
}

impl<T> Drop for KeyBinding<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .uninstall(self.id);
            tracing::trace!(key = %self.key, id = self.id, "key binding removed");
        }
    }
}
