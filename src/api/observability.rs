use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::api::AppState;

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.prometheus_handle {
        Some(handle) => handle.render(),
        None => "Metrics are disabled".to_string(),
    }
}

/// Wraps each request in a `request` span and records one completion event
/// plus the `http_requests_total` / `http_request_duration_seconds` series.
///
/// `user_id` starts empty and is filled in by the session guard.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned());

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %path,
        route = route.as_deref(),
        user_id = tracing::field::Empty,
    );

    let response = next.run(req).instrument(span.clone()).await;

    let elapsed = started.elapsed();
    let status = response.status();

    // Unmatched paths share a single label value.
    let label_path = route.unwrap_or_else(|| {
        if status.as_u16() == 404 {
            "unmatched".to_owned()
        } else {
            path
        }
    });
    let labels = [
        ("method", method.to_string()),
        ("path", label_path),
        ("status", status.as_u16().to_string()),
    ];
    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels).record(elapsed.as_secs_f64());

    span.in_scope(|| {
        info!(
            status = status.as_u16(),
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Request finished"
        );
    });

    response
}
