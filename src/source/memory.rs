//! In-process configuration source.

use std::sync::Arc;

use crate::error::FetchError;
use crate::source::store::{NamespaceStore, Properties};
use crate::source::{ChangeEvent, ChangeListener, ConfigSource};

/// A configuration source held entirely in memory.
///
/// Writes notify subscribers synchronously on the writing thread.
#[derive(Clone, Default)]
pub struct MemorySource {
    store: Arc<NamespaceStore>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single key and notify subscribers if the value changed.
    pub fn set(&self, namespace: &str, key: &str, value: impl Into<String>) -> ChangeEvent {
        let value = value.into();
        self.store.apply(namespace, |props| {
            props.insert(key.to_string(), value);
        })
    }

    /// Remove a single key and notify subscribers if it was present.
    pub fn remove(&self, namespace: &str, key: &str) -> ChangeEvent {
        self.store.apply(namespace, |props| {
            props.remove(key);
        })
    }

    /// Replace a whole namespace.
    pub fn publish<I, K, V>(&self, namespace: &str, properties: I) -> ChangeEvent
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let properties: Properties = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.store.replace(namespace, properties)
    }

    pub fn listener_count(&self, namespace: &str) -> usize {
        self.store.listener_count(namespace)
    }
}

impl ConfigSource for MemorySource {
    fn get(&self, namespace: &str, key: &str, default_val: &str) -> Result<String, FetchError> {
        Ok(self
            .store
            .get(namespace, key)
            .unwrap_or_else(|| default_val.to_string()))
    }

    fn subscribe(&self, namespace: &str, listener: Arc<dyn ChangeListener>) -> Result<(), FetchError> {
        self.store.subscribe(namespace, listener);
        Ok(())
    }
}
