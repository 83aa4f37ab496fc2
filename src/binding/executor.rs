//! Field rebinding.
//!
//! # Responsibilities
//! - Fetch the raw value (source value, or the field's default)
//! - Decode it into the field's declared type
//! - Write it into the owning object
//!
//! # Design Decisions
//! - Fail fast per field: no retries here; the next change event is the retry
//! - A field whose owner was dropped is skipped silently, before fetching
//! - Within a wave, one field's failure never stops its siblings

use std::sync::Arc;

use crate::binding::{BoundField, ConfigItem};
use crate::error::{RebindError, RebindErrorKind};
use crate::observability::metrics::{self, RebindTrigger};
use crate::source::ConfigSource;

/// Result of a successful rebind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebindOutcome {
    /// The new value was written.
    Applied,
    /// The owning object no longer exists.
    Dropped,
}

impl RebindOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebindOutcome::Applied => "applied",
            RebindOutcome::Dropped => "dropped",
        }
    }
}

/// Summary of one rebind wave.
#[derive(Debug, Default)]
pub struct WaveReport {
    pub applied: usize,
    pub dropped: usize,
    pub failures: Vec<RebindError>,
}

impl WaveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rebinds fields from a configuration source.
#[derive(Clone)]
pub struct RebindExecutor {
    source: Arc<dyn ConfigSource>,
}

impl RebindExecutor {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn ConfigSource> {
        &self.source
    }

    /// Fetch, decode and write one field.
    pub fn rebind(&self, field: &BoundField) -> Result<RebindOutcome, RebindError> {
        if !field.is_alive() {
            return Ok(RebindOutcome::Dropped);
        }

        let item = field.item();
        let fail = |kind: RebindErrorKind| RebindError {
            item: item.clone(),
            field: field.field(),
            kind,
        };

        let raw = self
            .source
            .get(item.namespace(), item.key(), field.default_val())
            .map_err(|e| fail(e.into()))?;

        match field.apply(&raw) {
            None => Ok(RebindOutcome::Dropped),
            Some(Ok(())) => {
                tracing::debug!(
                    namespace = item.namespace(),
                    key = item.key(),
                    field = field.field(),
                    raw = %raw,
                    "Field rebound"
                );
                Ok(RebindOutcome::Applied)
            }
            Some(Err(e)) => Err(fail(e.into())),
        }
    }

    /// Rebind every field of one item in order, isolating failures.
    pub fn rebind_wave(&self, item: &ConfigItem, fields: &[BoundField]) -> WaveReport {
        let mut report = WaveReport::default();

        for field in fields {
            match self.rebind(field) {
                Ok(outcome) => {
                    metrics::record_rebind(RebindTrigger::Change, outcome.as_str());
                    match outcome {
                        RebindOutcome::Applied => report.applied += 1,
                        RebindOutcome::Dropped => report.dropped += 1,
                    }
                }
                Err(e) => {
                    metrics::record_rebind(RebindTrigger::Change, "failed");
                    tracing::error!(
                        namespace = item.namespace(),
                        key = item.key(),
                        field = e.field,
                        raw = ?e.raw_value(),
                        error = %e,
                        "Rebind failed; keeping last bound value"
                    );
                    report.failures.push(e);
                }
            }
        }

        report
    }
}
