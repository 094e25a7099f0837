//! Prometheus metrics

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::Label;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use leaddesk_core::Priority;

use crate::state::AppState;

/// Install the global Prometheus recorder
///
/// Returns `None` if a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed");
            None
        },
    }
}

pub fn record_request(method: &str, path: &str, status: u16, elapsed_secs: f64) {
    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("path", path.to_string()),
        Label::new("status", status.to_string()),
    ];
    metrics::counter!("leaddesk_http_requests_total", labels.clone()).increment(1);
    metrics::histogram!("leaddesk_http_request_duration_seconds", labels).record(elapsed_secs);
}

pub fn record_lead_captured(priority: Priority) {
    metrics::counter!("leaddesk_leads_captured_total", "priority" => priority.as_str())
        .increment(1);
}

pub fn record_access_denied(route: &'static str) {
    metrics::counter!("leaddesk_access_denied_total", "route" => route).increment(1);
}

pub fn record_rate_limited() {
    metrics::counter!("leaddesk_rate_limited_total").increment(1);
}

/// Request counter and latency middleware
///
/// Runs per route, so the matched route template is known.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Metrics disabled").into_response(),
    }
}
