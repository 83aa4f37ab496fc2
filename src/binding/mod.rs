//! Remote configuration binding subsystem.
//!
//! # Data Flow
//! ```text
//! Binder::bind(Arc<T>)
//!     → scanner.rs (T's field table → bound fields)
//!     → executor.rs (fetch → decoder.rs → Live<V>::store)
//!     → registry.rs (item → [BoundField], first field subscribes a bridge)
//!
//! On a source change event:
//!     bridge.rs filters by namespace + key
//!     → registry.rs looks up the item's fields
//!     → executor.rs rebinds each field independently
//! ```
//!
//! # Design Decisions
//! - Field tables are built once per type, not discovered per instance
//! - The registry lives in an explicit `BindingEngine` handed to binders,
//!   not in a global
//! - Bound fields reference their owners weakly

pub mod binder;
pub mod bound;
pub mod bridge;
pub mod decoder;
pub mod engine;
pub mod executor;
pub mod field;
pub mod item;
pub mod registry;
pub mod scanner;

pub use binder::Binder;
pub use bound::BoundField;
pub use bridge::ChangeBridge;
pub use decoder::decode;
pub use engine::BindingEngine;
pub use executor::{RebindExecutor, RebindOutcome, WaveReport};
pub use field::{Configurable, FieldDescriptor, FieldTable, Live};
pub use item::ConfigItem;
pub use registry::BindingRegistry;
