//! Prometheus metrics for platform observability.

use metrics::counter;

/// Initialize metrics exporter (Prometheus).
pub fn init_metrics() {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record a review lifecycle event (created/updated/deleted).
pub fn review_event(action: &str) {
    counter!("hyoron_reviews_total", "action" => action.to_string()).increment(1);
}

/// Record a program lifecycle event.
pub fn program_event(action: &str) {
    counter!("hyoron_programs_total", "action" => action.to_string()).increment(1);
}

/// Record an edit request lifecycle event.
pub fn edit_request_event(action: &str) {
    counter!("hyoron_edit_requests_total", "action" => action.to_string()).increment(1);
}

/// Record a share job being enqueued.
pub fn share_job_enqueued(provider: &str) {
    counter!("hyoron_share_jobs_enqueued_total", "provider" => provider.to_string()).increment(1);
}

/// Record a share job reaching a terminal status.
pub fn share_job_finished(provider: &str, status: &str) {
    counter!(
        "hyoron_share_jobs_finished_total",
        "provider" => provider.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
