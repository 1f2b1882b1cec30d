//! Size guard middleware.
//!
//! Runs after route identification and before the handler:
//! ```text
//! request → snapshot (headers only)
//!         → [text/plain only] peek at the first body bytes
//!         → SizeGuard::evaluate
//!         → Pass: rebuilt request continues down the chain
//!         → Reject: body dropped, chain short-circuited, 413 returned
//! ```

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::{stream, StreamExt};

use crate::guard::{GuardVerdict, RequestSnapshot, SizeGuard};
use crate::http::request::{request_id, route_identifier};

/// Middleware enforcing per-route JSON size limits.
pub async fn size_guard_middleware(
    State(guard): State<SizeGuard>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let route_id = route_identifier(&req);
    let request_id = request_id(&req).to_string();
    let (parts, body) = req.into_parts();

    let mut snapshot = RequestSnapshot::from_parts(&parts, route_id);
    let body = if guard.needs_preview(&snapshot) {
        let (preview, body) = peek_body(body, guard.sniff_bytes()).await;
        snapshot = snapshot.with_body_preview(preview);
        body
    } else {
        body
    };

    match guard.evaluate(&snapshot) {
        GuardVerdict::Pass => next.run(Request::from_parts(parts, body)).await,
        GuardVerdict::Reject(rejection) => {
            drop(body);
            tracing::warn!(
                request_id = %request_id,
                route = %snapshot.route_id,
                received_bytes = rejection.received_bytes,
                allowed_bytes = rejection.allowed_bytes,
                "Rejected oversized JSON payload"
            );
            rejection.into_response()
        }
    }
}

/// Read up to `limit` leading bytes of a body without consuming it.
///
/// Reading stops early once a non-whitespace byte arrives, since that byte
/// alone decides the sniff. Returns the preview and a body that replays the
/// buffered chunks followed by the rest of the stream. A read error is
/// replayed in place, so the handler observes it exactly as it would have
/// without the peek.
pub async fn peek_body(body: Body, limit: usize) -> (Bytes, Body) {
    let mut rest = body.into_data_stream();
    let mut buffered = Vec::new();
    let mut preview: Vec<u8> = Vec::with_capacity(limit);

    while preview.len() < limit && preview.iter().all(u8::is_ascii_whitespace) {
        match rest.next().await {
            Some(Ok(chunk)) => {
                let take = chunk.len().min(limit - preview.len());
                preview.extend_from_slice(&chunk[..take]);
                buffered.push(Ok(chunk));
            }
            Some(Err(e)) => {
                buffered.push(Err(e));
                break;
            }
            None => break,
        }
    }

    let replay = Body::from_stream(stream::iter(buffered).chain(rest));
    (Bytes::from(preview), replay)
}
