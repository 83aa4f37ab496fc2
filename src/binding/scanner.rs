//! Field discovery.
//!
//! Turns an object's field table into bound fields. Purely inspective: nothing
//! is fetched or registered here.

use std::collections::HashSet;
use std::sync::Arc;

use crate::binding::item::full_namespace;
use crate::binding::{BoundField, ConfigItem, Configurable};
use crate::error::ScanError;

/// Produce one entry per marked field of `object`, in declaration order.
///
/// A malformed marker yields an error for that field only.
pub fn scan<T: Configurable>(object: &Arc<T>, project: &str) -> Vec<Result<BoundField, ScanError>> {
    let mut seen = HashSet::new();

    T::field_table()
        .iter()
        .map(|descriptor| {
            let field = descriptor.name().to_string();
            if descriptor.namespace().is_empty() {
                return Err(ScanError::EmptyNamespace { field });
            }
            if descriptor.key().is_empty() {
                return Err(ScanError::EmptyKey { field });
            }
            if !seen.insert(descriptor.name()) {
                return Err(ScanError::DuplicateField { field });
            }

            let item = ConfigItem::new(full_namespace(project, descriptor.namespace()), descriptor.key());
            Ok(BoundField::new(item, object, descriptor))
        })
        .collect()
}
