//! Configuration source boundary.
//!
//! # Data Flow
//! ```text
//! binder ──get(namespace, key, default)──▶ ConfigSource ──▶ raw string
//! binder ──subscribe(namespace, listener)─▶ ConfigSource
//!
//! remote change:
//!     ConfigSource (own thread) → ChangeListener::on_change(ChangeEvent)
//! ```
//!
//! # Design Decisions
//! - Sources are synchronous; `get` may block on I/O
//! - Events cover a whole namespace; listeners filter by key
//! - Listeners are invoked without any source-internal lock held
//! - `subscribe` only records the listener; it never blocks

pub mod file;
pub mod memory;
pub mod store;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::FetchError;

pub use file::FileSource;
pub use memory::MemorySource;
pub use store::NamespaceStore;

/// A namespaced key-value configuration service.
pub trait ConfigSource: Send + Sync {
    /// Look up `key` in `namespace`, returning `default_val` when the
    /// namespace has no entry for it.
    fn get(&self, namespace: &str, key: &str, default_val: &str) -> Result<String, FetchError>;

    /// Register `listener` for every change within `namespace`.
    ///
    /// Called while the binding registry holds a shard lock, so this must
    /// not block on I/O or wait for event delivery; record the listener and
    /// return. Remote sources should open long-polls from their own thread.
    fn subscribe(&self, namespace: &str, listener: Arc<dyn ChangeListener>) -> Result<(), FetchError>;
}

/// Receiver of namespace change notifications.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, event: &ChangeEvent);
}

/// Kind of change applied to a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

/// Old and new value of one changed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_type: ChangeType,
}

/// A batch of changes within one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub namespace: String,
    pub changes: BTreeMap<String, PropertyChange>,
}

impl ChangeEvent {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            changes: BTreeMap::new(),
        }
    }

    /// Add one key change to the event.
    pub fn with_change(
        mut self,
        key: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        let change_type = match (&old_value, &new_value) {
            (None, _) => ChangeType::Added,
            (Some(_), None) => ChangeType::Deleted,
            (Some(_), Some(_)) => ChangeType::Modified,
        };
        self.changes.insert(
            key.into(),
            PropertyChange {
                old_value,
                new_value,
                change_type,
            },
        );
        self
    }

    /// Keys touched by this event, in sorted order.
    pub fn changed_keys(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    pub fn is_changed(&self, key: &str) -> bool {
        self.changes.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_types() {
        let event = ChangeEvent::new("app.svc")
            .with_change("a", None, Some("1".into()))
            .with_change("b", Some("1".into()), Some("2".into()))
            .with_change("c", Some("1".into()), None);

        assert_eq!(event.changes["a"].change_type, ChangeType::Added);
        assert_eq!(event.changes["b"].change_type, ChangeType::Modified);
        assert_eq!(event.changes["c"].change_type, ChangeType::Deleted);
        assert_eq!(event.changed_keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(event.is_changed("b"));
        assert!(!event.is_changed("d"));
    }
}
