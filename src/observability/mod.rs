//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, validator, registry produce:
//!     → logging.rs (structured log events, request spans)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the request span
//! - Metrics calls are cheap no-ops when no recorder is installed

pub mod logging;
pub mod metrics;
