//! Remote configuration binding.
//!
//! Marks struct fields as bound to `(namespace, key)` items of a
//! configuration source, fills them on bind and rewrites them whenever the
//! source reports a change.

pub mod binding;
pub mod config;
pub mod error;
pub mod observability;
pub mod source;

pub use binding::{Binder, BindingEngine, BindingRegistry, ConfigItem, Configurable, Live};
pub use config::BinderConfig;
pub use error::{BindError, DecodeError, FetchError, RebindError, ScanError};
pub use source::{ChangeEvent, ChangeListener, ConfigSource, FileSource, MemorySource};
