//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the guard installed before the handler
//! - Wire up middleware (request ID, tracing, timeout, route identity)
//! - Forward guarded requests to the upstream, or echo when none is set
//! - Apply configuration reloads to the guard
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, Scheme},
        Request, StatusCode, Uri,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::{parse_upstream_authority, ValidationError};
use crate::config::GuardConfig;
use crate::error::GuardError;
use crate::guard::{LimitResolver, SizeGuard};
use crate::http::guard::size_guard_middleware;
use crate::http::request::{request_id, route_identifier, route_identity_middleware};
use crate::http::response::ErrorResponse;
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Upstream application receiving guarded requests.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl Upstream {
    pub fn new(address: &str) -> Result<Self, ValidationError> {
        let authority = parse_upstream_authority(address)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self { client, authority })
    }

    /// Forward a request, streaming its body to the upstream.
    async fn forward(&self, request: Request<Body>) -> Response {
        let request_id = request_id(&request).to_string();
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        parts.uri = match Uri::from_parts(uri_parts) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Cannot rewrite request URI");
                return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new("Invalid request URI")))
                    .into_response();
            }
        };

        let upstream_response: Result<Response<hyper::body::Incoming>, _> =
            self.client.request(Request::from_parts(parts, body)).await;
        match upstream_response {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Upstream error");
                (StatusCode::BAD_GATEWAY, Json(ErrorResponse::new("Upstream request failed")))
                    .into_response()
            }
        }
    }
}

/// Largest body the echo handler buffers.
pub const ECHO_BODY_LIMIT: usize = 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone, Default)]
pub struct AppState {
    pub upstream: Option<Upstream>,
}

/// Body returned by the built-in echo handler.
#[derive(Debug, Serialize, Deserialize)]
pub struct EchoResponse {
    pub route: String,
    pub received_bytes: usize,
}

/// HTTP server hosting the size guard.
pub struct HttpServer {
    router: Router,
    config: GuardConfig,
    guard: SizeGuard,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GuardConfig) -> Result<Self, GuardError> {
        let resolver = LimitResolver::from_config(&config)?;
        let guard = SizeGuard::new(resolver).with_sniff_bytes(config.guard.sniff_bytes);
        let routes = Arc::new(RouteTable::from_config(&config.routes));
        let upstream = config
            .upstream
            .as_ref()
            .map(|u| Upstream::new(&u.address))
            .transpose()?;

        tracing::info!(
            routes = routes.len(),
            limits = config.limits.len(),
            default_max_bytes = guard.default_max_bytes(),
            upstream = ?config.upstream.as_ref().map(|u| u.address.as_str()),
            "Guard configured"
        );

        let router = Self::build_router(&config, AppState { upstream }, guard.clone(), routes);
        Ok(Self {
            router,
            config,
            guard,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost first: request id, trace, timeout, route
    /// identity, size guard, handler.
    #[allow(deprecated)]
    fn build_router(config: &GuardConfig, state: AppState, guard: SizeGuard, routes: Arc<RouteTable>) -> Router {
        Router::new()
            .route("/", any(guarded_handler))
            .route("/{*path}", any(guarded_handler))
            .with_state(state)
            .layer(middleware::from_fn_with_state(guard, size_guard_middleware))
            .layer(middleware::from_fn_with_state(routes, route_identity_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the guard's limits
    /// atomically. Routes and upstream are fixed for the server's lifetime.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GuardConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let guard = self.guard.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_reload(&guard, &config);
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Router with all layers, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn guard(&self) -> &SizeGuard {
        &self.guard
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}

/// Swap in the limits of a reloaded configuration, keeping the current ones on error.
pub fn apply_reload(guard: &SizeGuard, config: &GuardConfig) {
    match LimitResolver::from_config(config) {
        Ok(resolver) => {
            let limits = resolver.config().route_limits.len();
            let default_max_bytes = resolver.default_max_bytes();
            guard.reload(resolver);
            metrics::record_config_reload("applied");
            tracing::info!(limits, default_max_bytes, "Guard limits reloaded");
        }
        Err(e) => {
            metrics::record_config_reload("rejected");
            tracing::error!(error = %e, "Reloaded limits rejected, keeping current limits");
        }
    }
}

/// Handler behind the guard: forwards upstream, or echoes when none is set.
async fn guarded_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match &state.upstream {
        Some(upstream) => upstream.forward(request).await,
        None => echo(request).await,
    }
}

async fn echo(request: Request<Body>) -> Response {
    let route = route_identifier(&request);
    match axum::body::to_bytes(request.into_body(), ECHO_BODY_LIMIT).await {
        Ok(bytes) => Json(EchoResponse {
            route,
            received_bytes: bytes.len(),
        })
        .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Failed to read request body: {}", e))),
        )
            .into_response(),
    }
}
