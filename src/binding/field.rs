//! Bindable fields and per-type field tables.
//!
//! # Design Decisions
//! - A type declares its remote fields once, in a static `FieldTable`
//! - Each descriptor carries a decode-and-store function, so the engine
//!   writes typed values without knowing the field's type
//! - Fields are `Live<V>` cells so they can be rewritten behind a shared `Arc`

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::de::DeserializeOwned;

use crate::binding::decoder::{decode, is_textual};
use crate::error::DecodeError;

/// A field value that can be replaced while the owner is shared.
pub struct Live<V> {
    value: ArcSwap<V>,
}

impl<V> Live<V> {
    pub fn new(value: V) -> Self {
        Self {
            value: ArcSwap::from_pointee(value),
        }
    }

    /// Snapshot of the current value.
    pub fn load(&self) -> Arc<V> {
        self.value.load_full()
    }

    /// Replace the current value.
    pub fn store(&self, value: V) {
        self.value.store(Arc::new(value));
    }
}

impl<V: Clone> Live<V> {
    pub fn get(&self) -> V {
        V::clone(&self.value.load())
    }
}

impl<V: Default> Default for Live<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: fmt::Debug> fmt::Debug for Live<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Live").field(&*self.value.load()).finish()
    }
}

type ApplyFn<T> = Box<dyn Fn(&T, &str) -> Result<(), DecodeError> + Send + Sync>;

/// Binding marker for one field of `T`.
pub struct FieldDescriptor<T> {
    name: &'static str,
    namespace: String,
    key: String,
    default_val: String,
    type_name: &'static str,
    textual: bool,
    apply: ApplyFn<T>,
}

impl<T: 'static> FieldDescriptor<T> {
    /// Mark the field reached through `accessor`.
    ///
    /// `namespace` is the short form; the binder prefixes it with its project.
    pub fn new<V>(
        name: &'static str,
        namespace: impl Into<String>,
        key: impl Into<String>,
        accessor: fn(&T) -> &Live<V>,
    ) -> Self
    where
        V: DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            name,
            namespace: namespace.into(),
            key: key.into(),
            default_val: String::new(),
            type_name: std::any::type_name::<V>(),
            textual: is_textual::<V>(),
            apply: Box::new(move |target: &T, raw: &str| {
                let value = decode::<V>(raw)?;
                accessor(target).store(value);
                Ok(())
            }),
        }
    }

    /// Value used when the source has no entry for the key.
    pub fn default_val(mut self, default_val: impl Into<String>) -> Self {
        self.default_val = default_val.into();
        self
    }
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &str {
        &self.default_val
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_textual(&self) -> bool {
        self.textual
    }

    /// Decode `raw` and write it into the field on `target`.
    pub fn apply(&self, target: &T, raw: &str) -> Result<(), DecodeError> {
        (self.apply)(target, raw)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("key", &self.key)
            .field("default_val", &self.default_val)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Ordered set of marked fields of one type.
pub struct FieldTable<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> FieldTable<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, descriptor: FieldDescriptor<T>) -> Self {
        self.fields.push(descriptor);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor<T>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A type whose fields can be bound to remote configuration.
///
/// Usually implemented with [`remote_config!`](crate::remote_config).
pub trait Configurable: Send + Sync + Sized + 'static {
    /// The type's field table, built once.
    fn field_table() -> &'static FieldTable<Self>;
}

/// Implement [`Configurable`] for a struct from a list of marked fields.
///
/// ```
/// use config_binder::Live;
///
/// #[derive(Default)]
/// struct Service {
///     retries: Live<u32>,
///     name: Live<String>,
/// }
///
/// config_binder::remote_config!(Service {
///     retries => ("svc", "maxRetries", "3"),
///     name => ("svc", "name"),
/// });
/// ```
#[macro_export]
macro_rules! remote_config {
    ($ty:ident { $( $field:ident => ($ns:expr, $key:expr $(, $default:expr)?) ),* $(,)? }) => {
        impl $crate::binding::Configurable for $ty {
            fn field_table() -> &'static $crate::binding::FieldTable<Self> {
                static TABLE: ::std::sync::LazyLock<$crate::binding::FieldTable<$ty>> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::binding::FieldTable::new()
                            $(
                                .field(
                                    $crate::binding::FieldDescriptor::<$ty>::new(
                                        stringify!($field),
                                        $ns,
                                        $key,
                                        |target: &$ty| &target.$field,
                                    )
                                    $( .default_val($default) )?
                                )
                            )*
                    });
                &TABLE
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Limits {
        retries: Live<u32>,
        label: Live<String>,
        plain: u8,
    }

    crate::remote_config!(Limits {
        retries => ("svc", "maxRetries", "3"),
        label => ("svc", "label"),
    });

    #[test]
    fn test_live_store_and_load() {
        let live = Live::new(1u32);
        let before = live.load();
        live.store(2);
        assert_eq!(*before, 1);
        assert_eq!(live.get(), 2);
        assert_eq!(format!("{:?}", live), "Live(2)");
    }

    #[test]
    fn test_table_built_once() {
        let a = Limits::field_table() as *const FieldTable<Limits>;
        let b = Limits::field_table() as *const FieldTable<Limits>;
        assert_eq!(a, b);
        assert_eq!(Limits::field_table().len(), 2);
    }

    #[test]
    fn test_descriptor_metadata() {
        let fields: Vec<_> = Limits::field_table().iter().collect();
        assert_eq!(fields[0].name(), "retries");
        assert_eq!(fields[0].namespace(), "svc");
        assert_eq!(fields[0].key(), "maxRetries");
        assert_eq!(fields[0].default_value(), "3");
        assert_eq!(fields[0].type_name(), "u32");
        assert!(!fields[0].is_textual());
        assert_eq!(fields[1].default_value(), "");
        assert!(fields[1].is_textual());
    }

    #[test]
    fn test_apply_writes_field() {
        let limits = Limits::default();
        let fields: Vec<_> = Limits::field_table().iter().collect();

        fields[0].apply(&limits, "9").unwrap();
        fields[1].apply(&limits, "edge").unwrap();
        assert_eq!(limits.retries.get(), 9);
        assert_eq!(limits.label.get(), "edge");
        assert_eq!(limits.plain, 0);

        assert!(fields[0].apply(&limits, "nine").is_err());
        assert_eq!(limits.retries.get(), 9);
    }
}
