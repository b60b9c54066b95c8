use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Marks one in-flight fetch as stale.
///
/// Clones share the flag, so the fetch task and the owner observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Hands out one live token at a time; issuing a new token cancels the previous one.
#[derive(Debug, Default)]
pub struct CancellationSource {
    current: Option<CancellationToken>,
}

impl CancellationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        token
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

impl Drop for CancellationSource {
    fn drop(&mut self) {
        self.cancel();
    }
}
