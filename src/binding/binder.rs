//! Object binding entry point.
//!
//! # Data Flow
//! ```text
//! bind(Arc<T>)
//!     → scanner.rs (marked fields → BoundField)
//!     → executor.rs (initial fetch + decode + write)
//!     → registry.rs (register item; first registration subscribes a bridge)
//!     → registry.rs (append field)
//! ```
//!
//! # Design Decisions
//! - Every field is attempted; failures are collected and returned together
//! - A field that fails its initial bind is not registered
//! - Binders are cheap handles over a shared `BindingEngine`; subscriptions
//!   belong to the engine, not to the binder that created them

use std::sync::Arc;

use crate::binding::bridge::ChangeBridge;
use crate::binding::engine::BindingEngine;
use crate::binding::registry::BindingRegistry;
use crate::binding::scanner::scan;
use crate::binding::{BoundField, Configurable};
use crate::error::{BindError, FieldFailure};
use crate::observability::metrics::{self, RebindTrigger};
use crate::source::ConfigSource;

/// Binds objects' marked fields to a configuration source and keeps them
/// synchronized.
#[derive(Clone)]
pub struct Binder {
    project: Arc<str>,
    engine: Arc<BindingEngine>,
}

impl Binder {
    /// Create a binder with its own engine over `source`.
    pub fn new(project: impl Into<String>, source: Arc<dyn ConfigSource>) -> Self {
        Self::with_engine(project, Arc::new(BindingEngine::new(source)))
    }

    /// Create a binder over an existing engine, sharing its registry and
    /// source with every other binder built on it.
    pub fn with_engine(project: impl Into<String>, engine: Arc<BindingEngine>) -> Self {
        let project: String = project.into();
        Self {
            project: project.into(),
            engine,
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn engine(&self) -> &Arc<BindingEngine> {
        &self.engine
    }

    pub fn registry(&self) -> &BindingRegistry {
        self.engine.registry()
    }

    /// Bind every marked field of `object` and return it.
    ///
    /// Fails if any field could not be bound; the fields that did bind stay
    /// registered and follow later changes.
    pub fn bind<T: Configurable>(&self, object: Arc<T>) -> Result<Arc<T>, BindError> {
        let type_name = std::any::type_name::<T>();
        let scanned = scan(&object, &self.project);
        if scanned.is_empty() {
            return Ok(object);
        }

        tracing::debug!(type_name, fields = scanned.len(), "Binding object");

        let mut failures = Vec::new();
        for entry in scanned {
            let field = match entry {
                Ok(field) => field,
                Err(e) => {
                    tracing::error!(type_name, error = %e, "Invalid field marker");
                    failures.push(e.into());
                    continue;
                }
            };

            if let Err(failure) = self.bind_field(field) {
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            Ok(object)
        } else {
            Err(BindError { type_name, failures })
        }
    }

    fn bind_field(&self, field: BoundField) -> Result<(), FieldFailure> {
        let item = field.item().clone();

        match self.engine.executor().rebind(&field) {
            Ok(outcome) => {
                metrics::record_rebind(RebindTrigger::Initial, outcome.as_str());
                tracing::info!(
                    namespace = item.namespace(),
                    key = item.key(),
                    field = field.field(),
                    "Field bound"
                );
            }
            Err(e) => {
                metrics::record_rebind(RebindTrigger::Initial, "failed");
                tracing::error!(
                    namespace = item.namespace(),
                    key = item.key(),
                    field = field.field(),
                    raw = ?e.raw_value(),
                    error = %e,
                    "Initial bind failed"
                );
                return Err(e.into());
            }
        }

        let created = self
            .engine
            .registry()
            .register_if_absent_with(&item, || {
                let bridge = ChangeBridge::new(item.clone(), self.engine.clone());
                self.engine.source().subscribe(item.namespace(), Arc::new(bridge))
            })
            .map_err(|source| FieldFailure::Subscribe {
                item: item.clone(),
                source,
            })?;

        if created {
            metrics::record_subscription();
            metrics::record_registry_items(self.engine.registry().len());
            tracing::info!(namespace = item.namespace(), key = item.key(), "Subscribed to configuration item");
        }

        if self.engine.registry().append(&item, field) {
            metrics::record_bound_field();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{ConfigItem, Live};
    use crate::source::MemorySource;

    #[derive(Default)]
    struct Worker {
        threads: Live<u16>,
        queue: Live<String>,
    }

    crate::remote_config!(Worker {
        threads => ("worker", "threads", "2"),
        queue => ("worker", "queue", "default"),
    });

    #[derive(Debug, Default)]
    struct Broken {
        count: Live<u16>,
        label: Live<String>,
    }

    crate::remote_config!(Broken {
        count => ("worker", "threads"),
        label => ("broken", "label", "ok"),
    });

    #[test]
    fn test_bind_applies_and_registers() {
        let source = MemorySource::new();
        source.set("svc.worker", "queue", "jobs");
        let binder = Binder::new("svc", Arc::new(source.clone()));

        let worker = binder.bind(Arc::new(Worker::default())).unwrap();
        assert_eq!(worker.threads.get(), 2);
        assert_eq!(worker.queue.get(), "jobs");
        assert_eq!(binder.registry().len(), 2);
        assert_eq!(binder.registry().get(&ConfigItem::new("svc.worker", "threads")).len(), 1);
        assert_eq!(source.listener_count("svc.worker"), 2);
    }

    #[test]
    fn test_failed_field_is_not_registered() {
        let source = MemorySource::new();
        source.set("svc.worker", "threads", "many");
        let binder = Binder::new("svc", Arc::new(source.clone()));

        let err = binder.bind(Arc::new(Broken::default())).unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert!(matches!(err.failures[0], FieldFailure::Rebind(_)));

        assert!(!binder.registry().contains(&ConfigItem::new("svc.worker", "threads")));
        assert!(binder.registry().contains(&ConfigItem::new("svc.broken", "label")));
    }

    #[test]
    fn test_shared_engine() {
        let source: Arc<dyn ConfigSource> = Arc::new(MemorySource::new());
        let engine = Arc::new(BindingEngine::new(source));
        let a = Binder::with_engine("svc", engine.clone());
        let b = Binder::with_engine("svc", engine.clone());

        a.bind(Arc::new(Worker::default())).unwrap();
        b.bind(Arc::new(Worker::default())).unwrap();
        assert_eq!(engine.registry().len(), 2);
        assert_eq!(engine.registry().field_count(), 4);
        assert!(Arc::ptr_eq(a.engine(), b.engine()));
        assert_eq!(a.project(), "svc");
    }
}
