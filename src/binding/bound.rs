//! Bound field targets.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::binding::field::{Configurable, FieldDescriptor};
use crate::binding::ConfigItem;
use crate::error::DecodeError;

/// Type-erased write access to one field of one live object.
pub(crate) trait FieldTarget: Send + Sync {
    /// Decode and write `raw`; `None` when the owner is gone.
    fn apply(&self, raw: &str) -> Option<Result<(), DecodeError>>;

    fn is_alive(&self) -> bool;
}

struct ObjectField<T: 'static> {
    object: Weak<T>,
    descriptor: &'static FieldDescriptor<T>,
}

impl<T: Configurable> FieldTarget for ObjectField<T> {
    fn apply(&self, raw: &str) -> Option<Result<(), DecodeError>> {
        let object = self.object.upgrade()?;
        Some(self.descriptor.apply(&object, raw))
    }

    fn is_alive(&self) -> bool {
        self.object.strong_count() > 0
    }
}

/// One marked field on one live object, tied to its configuration item.
///
/// Holds only a weak reference to the owner.
#[derive(Clone)]
pub struct BoundField {
    item: ConfigItem,
    field: &'static str,
    type_name: &'static str,
    default_val: &'static str,
    target: Arc<dyn FieldTarget>,
}

impl BoundField {
    pub(crate) fn new<T: Configurable>(
        item: ConfigItem,
        object: &Arc<T>,
        descriptor: &'static FieldDescriptor<T>,
    ) -> Self {
        Self {
            item,
            field: descriptor.name(),
            type_name: descriptor.type_name(),
            default_val: descriptor.default_value(),
            target: Arc::new(ObjectField {
                object: Arc::downgrade(object),
                descriptor,
            }),
        }
    }

    pub fn item(&self) -> &ConfigItem {
        &self.item
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn default_val(&self) -> &'static str {
        self.default_val
    }

    /// Whether the owning object is still reachable.
    pub fn is_alive(&self) -> bool {
        self.target.is_alive()
    }

    pub(crate) fn apply(&self, raw: &str) -> Option<Result<(), DecodeError>> {
        self.target.apply(raw)
    }
}

impl fmt::Debug for BoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundField")
            .field("item", &self.item)
            .field("field", &self.field)
            .field("type_name", &self.type_name)
            .field("default_val", &self.default_val)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Live;

    #[derive(Default)]
    struct Gate {
        open: Live<bool>,
    }

    crate::remote_config!(Gate {
        open => ("gate", "open", "false"),
    });

    fn bound(gate: &Arc<Gate>) -> BoundField {
        let descriptor = Gate::field_table().iter().next().unwrap();
        BoundField::new(ConfigItem::new("app.gate", "open"), gate, descriptor)
    }

    #[test]
    fn test_apply_through_weak_reference() {
        let gate = Arc::new(Gate::default());
        let field = bound(&gate);

        assert!(field.is_alive());
        assert!(matches!(field.apply("true"), Some(Ok(()))));
        assert!(gate.open.get());
        assert_eq!(field.default_val(), "false");
        assert_eq!(field.type_name(), "bool");
    }

    #[test]
    fn test_dropped_owner_is_skipped() {
        let gate = Arc::new(Gate::default());
        let field = bound(&gate);
        drop(gate);

        assert!(!field.is_alive());
        assert!(field.apply("true").is_none());
    }
}
