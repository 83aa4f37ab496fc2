//! Process-wide binding registry.
//!
//! # Invariants
//! - An item is a key at most once
//! - An item is a key iff its change bridge has been subscribed
//! - Each bound field lives in the list of its own item, in bind order
//!
//! # Design Decisions
//! - `DashMap` entry API gives an atomic check-and-insert per item
//! - The subscribe callback runs under the item's shard lock; other items in
//!   the same shard wait for it, so sources must subscribe without blocking
//! - Lists are append-only; dropped owners are skipped, never pruned

use std::convert::Infallible;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::binding::{BoundField, ConfigItem};

/// Map from configuration item to every field bound to it.
#[derive(Default)]
pub struct BindingRegistry {
    items: DashMap<ConfigItem, Vec<BoundField>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` with an empty field list if it is absent.
    ///
    /// Returns `true` for exactly one caller per item.
    pub fn register_if_absent(&self, item: &ConfigItem) -> bool {
        match self.register_if_absent_with(item, || Ok::<(), Infallible>(())) {
            Ok(created) => created,
            Err(never) => match never {},
        }
    }

    /// Like [`register_if_absent`](Self::register_if_absent), but runs
    /// `on_create` inside the same critical section and only inserts the
    /// item when it succeeds.
    ///
    /// `on_create` runs while the item's shard is locked: it must not call
    /// back into the registry, and anything slow in it stalls registration
    /// and lookup of every item sharing the shard.
    pub fn register_if_absent_with<E>(
        &self,
        item: &ConfigItem,
        on_create: impl FnOnce() -> Result<(), E>,
    ) -> Result<bool, E> {
        match self.items.entry(item.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                on_create()?;
                vacant.insert(Vec::new());
                Ok(true)
            }
        }
    }

    /// Append a field to a registered item.
    ///
    /// Returns `false`, dropping the field, when the item was never registered.
    #[must_use]
    pub fn append(&self, item: &ConfigItem, field: BoundField) -> bool {
        match self.items.get_mut(item) {
            Some(mut fields) => {
                fields.push(field);
                true
            }
            None => {
                tracing::warn!(item = %item, field = field.field(), "Append to unregistered item ignored");
                false
            }
        }
    }

    /// Fields bound to `item`, in bind order. Empty when absent.
    pub fn get(&self, item: &ConfigItem) -> Vec<BoundField> {
        self.items
            .get(item)
            .map(|fields| fields.value().clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, item: &ConfigItem) -> bool {
        self.items.contains_key(item)
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of bound fields across all items.
    pub fn field_count(&self) -> usize {
        self.items.iter().map(|r| r.value().len()).sum()
    }

    /// Registered items, sorted.
    pub fn items(&self) -> Vec<ConfigItem> {
        let mut items: Vec<_> = self.items.iter().map(|r| r.key().clone()).collect();
        items.sort();
        items
    }
}
