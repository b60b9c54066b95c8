use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::trace;

type Handler = Arc<Mutex<Box<dyn FnMut() + Send>>>;

struct Binding {
    id: u64,
    key: String, // Lowercased
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    bindings: Vec<Binding>,
}

/// Process-wide key gesture registry.
///
/// Handlers stay registered while their [`KeySubscription`] is alive.
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct KeyListener {
    registry: Arc<Mutex<Registry>>,
}

impl KeyListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `handler` for every dispatched key named `key` (case-insensitive)
    #[must_use = "the handler is deregistered when the subscription is dropped"]
    pub fn on_key<F>(&self, key: &str, handler: F) -> KeySubscription
    where
        F: FnMut() + Send + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.bindings.push(Binding {
            id,
            key: key.to_lowercase(),
            handler: Arc::new(Mutex::new(Box::new(handler))),
        });
        trace!(key = %key, id, "Registered key handler");

        KeySubscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Invoke every handler bound to `key`; returns how many ran
    pub fn dispatch(&self, key: &str) -> usize {
        let key = key.to_lowercase();
        // Collect first so handlers may add or drop subscriptions while running
        let handlers: Vec<Handler> = {
            let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry
                .bindings
                .iter()
                .filter(|b| b.key == key)
                .map(|b| b.handler.clone())
                .collect()
        };

        for handler in &handlers {
            let mut handler = handler.lock().unwrap_or_else(PoisonError::into_inner);
            (*handler)();
        }
        handlers.len()
    }

    pub fn binding_count(&self, key: &str) -> usize {
        let key = key.to_lowercase();
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.bindings.iter().filter(|b| b.key == key).count()
    }
}

/// Keeps a key handler registered; dropping it deregisters the handler.
pub struct KeySubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.bindings.retain(|b| b.id != self.id);
            trace!(id = self.id, "Deregistered key handler");
        }
    }
}
