//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search outcomes (cache hit, remote fetch, stale fallback, failure)
//! - Remote catalog calls
//! - Cache eviction

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Repository Metrics
// =============================================================================

/// Searches total by where the result came from.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("photocache_search_total", "Total photo searches served"),
        &["source"], // "cache", "remote", "stale_cache", "failed"
    )
    .unwrap()
});

/// Rows removed by the expiry sweep.
pub static CACHE_ROWS_EVICTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "photocache_cache_rows_evicted_total",
        "Cached photo rows removed by the expiry sweep",
    )
    .unwrap()
});

// =============================================================================
// Remote Catalog Metrics
// =============================================================================

/// Remote catalog request duration.
pub static REMOTE_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "photocache_remote_request_duration_seconds",
            "Duration of remote catalog calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

/// Remote catalog requests total.
pub static REMOTE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "photocache_remote_requests_total",
            "Total remote catalog requests",
        ),
        &["operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(CACHE_ROWS_EVICTED.clone()),
        Box::new(REMOTE_REQUEST_DURATION.clone()),
        Box::new(REMOTE_REQUESTS.clone()),
    ]
}

/// Record the outcome of a remote call.
pub fn record_remote_call(operation: &str, seconds: f64, success: bool) {
    REMOTE_REQUEST_DURATION
        .with_label_values(&[operation])
        .observe(seconds);
    REMOTE_REQUESTS
        .with_label_values(&[operation, if success { "success" } else { "error" }])
        .inc();
}
