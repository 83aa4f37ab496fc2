//! Shared test doubles for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use config_binder::source::{ChangeListener, ConfigSource};
use config_binder::{FetchError, MemorySource};

/// A memory-backed source that counts calls and can be made to fail.
#[derive(Default)]
pub struct CountingSource {
    pub inner: MemorySource,
    pub gets: AtomicUsize,
    pub subscribes: AtomicUsize,
    pub fail_gets: AtomicBool,
    pub fail_subscribes: AtomicBool,
}

#[allow(dead_code)]
impl CountingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_failing_gets(&self, failing: bool) {
        self.fail_gets.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_subscribes(&self, failing: bool) {
        self.fail_subscribes.store(failing, Ordering::SeqCst);
    }
}

impl ConfigSource for CountingSource {
    fn get(&self, namespace: &str, key: &str, default_val: &str) -> Result<String, FetchError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable("injected failure".into()));
        }
        self.inner.get(namespace, key, default_val)
    }

    fn subscribe(&self, namespace: &str, listener: Arc<dyn ChangeListener>) -> Result<(), FetchError> {
        if self.fail_subscribes.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable("injected failure".into()));
        }
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        self.inner.subscribe(namespace, listener)
    }
}
