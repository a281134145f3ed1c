//! Request logging middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

/// Emits one `event=http_request` line per request.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let http_status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if http_status.is_server_error() {
        warn!(
            "event=http_request module=api status=error method={method} path={path} http_status={} duration_ms={duration_ms}",
            http_status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=api status=ok method={method} path={path} http_status={} duration_ms={duration_ms}",
            http_status.as_u16()
        );
    }
    response
}
