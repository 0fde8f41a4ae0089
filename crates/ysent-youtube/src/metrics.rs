//! Data API metrics collection.
//!
//! Provides standardized metrics for monitoring Data API usage:
//! - Request counters by endpoint and status
//! - Latency histograms
//! - Harvest page and early-termination counters

use std::time::Duration;

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total Data API requests by endpoint and status.
    pub const REQUESTS_TOTAL: &str = "youtube_requests_total";

    /// Request latency in seconds by endpoint.
    pub const LATENCY_SECONDS: &str = "youtube_request_latency_seconds";

    /// Comment pages fetched.
    pub const COMMENT_PAGES_TOTAL: &str = "youtube_comment_pages_total";

    /// Harvests that stopped before end of stream or cap, by reason.
    pub const HARVEST_ENDED_EARLY_TOTAL: &str = "youtube_harvest_ended_early_total";
}

/// Record metrics for a completed request.
pub fn record_request(endpoint: &str, status: u16, latency: Duration) {
    counter!(
        names::REQUESTS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "endpoint" => endpoint.to_string()
    )
    .record(latency.as_secs_f64());
}

/// Record a fetched comment page.
pub fn record_comment_page() {
    counter!(names::COMMENT_PAGES_TOTAL).increment(1);
}

/// Record a harvest that ended early.
pub fn record_harvest_ended_early(reason: &'static str) {
    counter!(names::HARVEST_ENDED_EARLY_TOTAL, "reason" => reason).increment(1);
}
