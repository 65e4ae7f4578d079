//! Metrics and observability utilities
//!
//! Prometheus metric names and helpers for the request path and the
//! propagation hooks. Recording is a no-op until a recorder is installed,
//! so the services call these unconditionally.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all attainments metrics
pub const METRICS_PREFIX: &str = "attainments";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000,
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_articles_rescored_total", METRICS_PREFIX),
        Unit::Count,
        "Articles whose scores were copied from their journal"
    );

    describe_counter!(
        format!("{}_authorship_refreshes_total", METRICS_PREFIX),
        Unit::Count,
        "Article author summaries recomputed"
    );

    describe_counter!(
        format!("{}_photos_processed_total", METRICS_PREFIX),
        Unit::Count,
        "Profile photos cropped and resized"
    );

    describe_counter!(
        format!("{}_users_imported_total", METRICS_PREFIX),
        Unit::Count,
        "User rows handled by the bulk import"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Articles re-scored; `trigger` is "article" or "journal"
pub fn record_rescore(trigger: &'static str, articles: u64) {
    counter!(
        format!("{}_articles_rescored_total", METRICS_PREFIX),
        "trigger" => trigger
    )
    .increment(articles);
}

pub fn record_authorship_refresh() {
    counter!(format!("{}_authorship_refreshes_total", METRICS_PREFIX)).increment(1);
}

pub fn record_photo() {
    counter!(format!("{}_photos_processed_total", METRICS_PREFIX)).increment(1);
}

/// Import outcome per row; `outcome` is "created" or "failed"
pub fn record_import(outcome: &'static str) {
    counter!(
        format!("{}_users_imported_total", METRICS_PREFIX),
        "outcome" => outcome
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets_sorted() {
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_recording_without_recorder() {
        let metrics = RequestMetrics::start("GET", "/v1/journals");
        metrics.finish(200);
        record_rescore("journal", 3);
        record_authorship_refresh();
    }
}
