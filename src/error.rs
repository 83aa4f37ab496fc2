//! Error types for field scanning, fetching, decoding and binding.

use thiserror::Error;

use crate::binding::ConfigItem;

/// A field descriptor that cannot be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The marker declares no namespace.
    #[error("field `{field}` declares an empty namespace")]
    EmptyNamespace { field: String },

    /// The marker declares no key.
    #[error("field `{field}` declares an empty key")]
    EmptyKey { field: String },

    /// The same field is marked twice in one table.
    #[error("field `{field}` is marked more than once")]
    DuplicateField { field: String },
}

/// The configuration source could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The source cannot be reached or refused the request.
    #[error("configuration source unavailable: {0}")]
    Unavailable(String),
}

/// A raw value does not parse as the field's declared type.
#[derive(Debug, Error)]
#[error("cannot decode {raw:?} as `{type_name}`: {source}")]
pub struct DecodeError {
    /// Declared type of the target field.
    pub type_name: &'static str,
    /// The offending raw value.
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

/// Why a single field's rebind failed.
#[derive(Debug, Error)]
pub enum RebindErrorKind {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Failure to rebind one field from its configuration item.
#[derive(Debug, Error)]
#[error("rebind of field `{field}` from {item} failed: {kind}")]
pub struct RebindError {
    pub item: ConfigItem,
    pub field: &'static str,
    #[source]
    pub kind: RebindErrorKind,
}

impl RebindError {
    /// The raw value that failed to decode, if decoding was the failure.
    pub fn raw_value(&self) -> Option<&str> {
        match &self.kind {
            RebindErrorKind::Decode(e) => Some(&e.raw),
            RebindErrorKind::Fetch(_) => None,
        }
    }
}

/// One failed field within a bind pass.
#[derive(Debug, Error)]
pub enum FieldFailure {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Rebind(#[from] RebindError),

    /// The change subscription for the field's item could not be created.
    #[error("subscribing to {item} failed: {source}")]
    Subscribe {
        item: ConfigItem,
        #[source]
        source: FetchError,
    },
}

/// Initial binding of an object failed for one or more fields.
#[derive(Debug, Error)]
#[error("binding `{type_name}` failed for {} field(s): {}", .failures.len(), summarize(.failures))]
pub struct BindError {
    pub type_name: &'static str,
    pub failures: Vec<FieldFailure>,
}

fn summarize(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
