//! Size-gating decision engine.
//!
//! # Data Flow
//! ```text
//! Routed request (method, headers, route id)
//!     → snapshot.rs (capture declared length, content type, preview)
//!     → classifier.rs (POST? length > 0? JSON-like?)
//!     → resolver.rs (route id → byte limit)
//!     → size_guard.rs (compare, produce GuardVerdict)
//!     → Pass: continue pipeline / Reject: 413 before any parsing
//! ```
//!
//! # Design Decisions
//! - Stateless per request; the only shared data is the immutable resolver
//! - No I/O in this module: previews are captured by the HTTP layer

pub mod classifier;
pub mod resolver;
pub mod size_guard;
pub mod snapshot;
pub mod verdict;

pub use classifier::RequestClassifier;
pub use resolver::{LimitResolver, ResolverConfig, RouteKey, RouteLimits};
pub use size_guard::SizeGuard;
pub use snapshot::{ContentFormat, RequestSnapshot};
pub use verdict::GuardVerdict;
