//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, trace, timeout)
//!     → request.rs (assign route identifier)
//!     → guard.rs (size guard: pass, or 413 before the body is read)
//!     → handler (forward upstream / echo)
//!     → response.rs (structured error bodies)
//! ```

pub mod guard;
pub mod request;
pub mod response;
pub mod server;

pub use guard::size_guard_middleware;
pub use request::{route_identity_middleware, RouteId, X_REQUEST_ID};
pub use response::ErrorResponse;
pub use server::HttpServer;
