//! Routing subsystem: assigns a route identifier to each request.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, method)
//!     → router.rs (route lookup, priority order)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: route identifier or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Sort by priority
//!     → Compile matchers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use router::RouteTable;
