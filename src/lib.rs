//! JSON request size guard.
//!
//! Rejects JSON-bearing HTTP requests whose declared length exceeds the limit
//! configured for the route they target, before the body is read.

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GuardConfig;
pub use error::{GuardError, PayloadTooLarge};
pub use guard::{GuardVerdict, LimitResolver, RequestSnapshot, SizeGuard};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
