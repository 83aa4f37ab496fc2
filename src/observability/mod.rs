//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! binder, bridges, sources produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, binary only)
//! ```

pub mod logging;
pub mod metrics;
