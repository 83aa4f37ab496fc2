//! Namespace snapshots and listener lists shared by the bundled sources.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::source::{ChangeEvent, ChangeListener};

/// Properties of one namespace.
pub type Properties = HashMap<String, String>;

#[derive(Default)]
struct Namespace {
    properties: Properties,
    listeners: Vec<Arc<dyn ChangeListener>>,
}

/// Thread-safe namespace → properties map with change fan-out.
///
/// Listeners are cloned out of the map before being called, so a listener
/// may read back from the store while it handles an event.
#[derive(Default)]
pub struct NamespaceStore {
    namespaces: DashMap<String, Namespace>,
}

impl NamespaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, if the namespace holds it.
    pub fn get(&self, namespace: &str, key: &str) -> Option<String> {
        self.namespaces
            .get(namespace)
            .and_then(|ns| ns.properties.get(key).cloned())
    }

    /// Whether the namespace has been published or subscribed to.
    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    pub fn subscribe(&self, namespace: &str, listener: Arc<dyn ChangeListener>) {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .listeners
            .push(listener);
    }

    pub fn listener_count(&self, namespace: &str) -> usize {
        self.namespaces
            .get(namespace)
            .map(|ns| ns.listeners.len())
            .unwrap_or(0)
    }

    /// Known namespace names, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<_> = self.namespaces.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Replace a namespace's properties wholesale and notify listeners of
    /// the difference. Returns the delivered event.
    pub fn replace(&self, namespace: &str, properties: Properties) -> ChangeEvent {
        self.apply(namespace, move |current| *current = properties)
    }

    /// Mutate a namespace's properties in place and notify listeners of the
    /// difference. Returns the delivered event (empty when nothing changed).
    pub fn apply(&self, namespace: &str, mutate: impl FnOnce(&mut Properties)) -> ChangeEvent {
        let (event, listeners) = {
            let mut ns = self.namespaces.entry(namespace.to_string()).or_default();
            let old = ns.properties.clone();
            mutate(&mut ns.properties);
            let event = diff(namespace, &old, &ns.properties);
            (event, ns.listeners.clone())
        };

        if !event.is_empty() {
            tracing::debug!(
                namespace,
                changed = event.changes.len(),
                listeners = listeners.len(),
                "Delivering change event"
            );
            for listener in listeners {
                listener.on_change(&event);
            }
        }
        event
    }
}

fn diff(namespace: &str, old: &Properties, new: &Properties) -> ChangeEvent {
    let mut event = ChangeEvent::new(namespace);
    for (key, value) in new {
        match old.get(key) {
            Some(prev) if prev == value => {}
            prev => {
                event = event.with_change(key.clone(), prev.cloned(), Some(value.clone()));
            }
        }
    }
    for (key, prev) in old {
        if !new.contains_key(key) {
            event = event.with_change(key.clone(), Some(prev.clone()), None);
        }
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChangeType;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<ChangeEvent>>,
    }

    impl ChangeListener for Recorder {
        fn on_change(&self, event: &ChangeEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_replace_reports_diff() {
        let store = NamespaceStore::new();
        let recorder = Arc::new(Recorder::default());
        store.subscribe("app.svc", recorder.clone());

        store.replace("app.svc", Properties::from([("a".into(), "1".into()), ("b".into(), "2".into())]));
        let event = store.replace("app.svc", Properties::from([("a".into(), "1".into()), ("c".into(), "3".into())]));

        assert_eq!(event.changes.len(), 2);
        assert_eq!(event.changes["b"].change_type, ChangeType::Deleted);
        assert_eq!(event.changes["c"].change_type, ChangeType::Added);
        assert!(!event.is_changed("a"));
        assert_eq!(recorder.events.lock().unwrap().len(), 2);
        assert_eq!(store.get("app.svc", "c").as_deref(), Some("3"));
        assert_eq!(store.get("app.svc", "b"), None);
    }

    #[test]
    fn test_unchanged_publish_is_silent() {
        let store = NamespaceStore::new();
        let recorder = Arc::new(Recorder::default());
        store.subscribe("ns", recorder.clone());

        store.apply("ns", |p| {
            p.insert("k".into(), "v".into());
        });
        let event = store.apply("ns", |p| {
            p.insert("k".into(), "v".into());
        });

        assert!(event.is_empty());
        assert_eq!(recorder.events.lock().unwrap().len(), 1);
    }

    struct ReadBack {
        store: Arc<NamespaceStore>,
        seen: Mutex<Option<String>>,
    }

    impl ChangeListener for ReadBack {
        fn on_change(&self, event: &ChangeEvent) {
            *self.seen.lock().unwrap() = self.store.get(&event.namespace, "k");
        }
    }

    #[test]
    fn test_listener_can_read_store() {
        let store = Arc::new(NamespaceStore::new());
        let listener = Arc::new(ReadBack {
            store: store.clone(),
            seen: Mutex::new(None),
        });
        store.subscribe("ns", listener.clone());

        store.apply("ns", |p| {
            p.insert("k".into(), "fresh".into());
        });

        assert_eq!(listener.seen.lock().unwrap().as_deref(), Some("fresh"));
        assert_eq!(store.listener_count("ns"), 1);
        assert_eq!(store.namespaces(), vec!["ns".to_string()]);
    }
}
