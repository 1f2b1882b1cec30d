//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Guard, config reloads, HTTP layer produce:
//!     → logging.rs (structured log events, request id in spans)
//!     → metrics.rs (evaluation counters, declared size histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
