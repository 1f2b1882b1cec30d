//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + JSON_GUARD_DEFAULT_MAX_BYTES
//!     → loader.rs (parse, deserialize, env override)
//!     → validation.rs (semantic checks, all errors collected)
//!     → GuardConfig (validated, immutable)
//!     → LimitResolver compiled from [[limits]]
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads + validates new config
//!     → atomic swap of the resolver inside SizeGuard
//!     → in-flight requests finish against the old resolver
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::GuardConfig;
pub use schema::LimitConfig;
pub use schema::ListenerConfig;
pub use schema::RouteConfig;
pub use schema::UpstreamConfig;
