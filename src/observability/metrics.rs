//! Metrics collection and exposition.
//!
//! # Metrics
//! - `binder_bound_fields_total` (counter): fields appended to the registry
//! - `binder_subscriptions_total` (counter): change bridges subscribed
//! - `binder_rebinds_total` (counter): rebinds by trigger and outcome
//! - `binder_registry_items` (gauge): distinct configuration items bound
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// What caused a rebind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebindTrigger {
    Initial,
    Change,
}

impl RebindTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebindTrigger::Initial => "initial",
            RebindTrigger::Change => "change",
        }
    }
}

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_bound_field() {
    ::metrics::counter!("binder_bound_fields_total").increment(1);
}

pub fn record_subscription() {
    ::metrics::counter!("binder_subscriptions_total").increment(1);
}

pub fn record_rebind(trigger: RebindTrigger, outcome: &'static str) {
    ::metrics::counter!(
        "binder_rebinds_total",
        "trigger" => trigger.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_registry_items(count: usize) {
    ::metrics::gauge!("binder_registry_items").set(count as f64);
}
