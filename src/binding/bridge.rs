//! Change bridge: one source subscription per configuration item.
//!
//! # State Transitions
//! ```text
//! Unregistered → Registered: first field of the item is bound
//! Registered → Firing → Registered: one matching change event
//! ```
//!
//! The bridge looks its fields up at event time, so fields bound after the
//! subscription are still served. It holds the engine strongly, so it keeps
//! serving fields bound through any binder on that engine.

use std::sync::Arc;

use crate::binding::engine::BindingEngine;
use crate::binding::ConfigItem;
use crate::source::{ChangeEvent, ChangeListener};

/// Listener that rebinds every field of one item when that item changes.
pub struct ChangeBridge {
    item: ConfigItem,
    engine: Arc<BindingEngine>,
}

impl ChangeBridge {
    pub(crate) fn new(item: ConfigItem, engine: Arc<BindingEngine>) -> Self {
        Self { item, engine }
    }

    pub fn item(&self) -> &ConfigItem {
        &self.item
    }

    fn matches(&self, event: &ChangeEvent) -> bool {
        event.namespace == self.item.namespace() && event.is_changed(self.item.key())
    }
}

impl ChangeListener for ChangeBridge {
    fn on_change(&self, event: &ChangeEvent) {
        if !self.matches(event) {
            tracing::trace!(item = %self.item, namespace = %event.namespace, "Change event ignored");
            return;
        }

        let fields = self.engine.registry().get(&self.item);
        tracing::info!(
            namespace = self.item.namespace(),
            key = self.item.key(),
            fields = fields.len(),
            "Configuration item changed, rebinding"
        );

        let report = self.engine.executor().rebind_wave(&self.item, &fields);
        tracing::info!(
            namespace = self.item.namespace(),
            key = self.item.key(),
            applied = report.applied,
            dropped = report.dropped,
            failed = report.failures.len(),
            "Rebind wave complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Binder, Live};
    use crate::source::MemorySource;

    #[derive(Default)]
    struct Feature {
        enabled: Live<bool>,
    }

    crate::remote_config!(Feature {
        enabled => ("flags", "beta", "false"),
    });

    #[test]
    fn test_event_filtering() {
        let engine = Arc::new(BindingEngine::new(Arc::new(MemorySource::new())));
        let bridge = ChangeBridge::new(ConfigItem::new("app.flags", "beta"), engine);

        let own = ChangeEvent::new("app.flags").with_change("beta", None, Some("true".into()));
        let other_key = ChangeEvent::new("app.flags").with_change("alpha", None, Some("true".into()));
        let other_ns = ChangeEvent::new("app.other").with_change("beta", None, Some("true".into()));

        assert!(bridge.matches(&own));
        assert!(!bridge.matches(&other_key));
        assert!(!bridge.matches(&other_ns));
    }

    #[test]
    fn test_serves_fields_bound_after_subscription() {
        let source = MemorySource::new();
        let binder = Binder::new("app", Arc::new(source.clone()));

        let first = binder.bind(Arc::new(Feature::default())).unwrap();
        let second = binder.bind(Arc::new(Feature::default())).unwrap();
        assert_eq!(source.listener_count("app.flags"), 1);

        source.set("app.flags", "beta", "true");
        assert!(first.enabled.get());
        assert!(second.enabled.get());
    }

    #[test]
    fn test_bridge_outlives_binder() {
        let source = MemorySource::new();
        let feature = {
            let binder = Binder::new("app", Arc::new(source.clone()));
            binder.bind(Arc::new(Feature::default())).unwrap()
        };

        source.set("app.flags", "beta", "true");
        assert!(feature.enabled.get());
    }
}
