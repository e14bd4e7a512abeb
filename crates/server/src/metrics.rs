//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the photocache server:
//! - HTTP request metrics (latency, counts, in flight)
//! - WebSocket connection metrics
//! - Cache contents (collected dynamically)
//!
//! Repository and remote catalog metrics live in `photocache_core::metrics`
//! and are registered here too.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "photocache_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("photocache_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "photocache_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// WebSocket Metrics
// =============================================================================

/// Active WebSocket connections.
pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "photocache_ws_connections_active",
        "Number of active WebSocket connections",
    )
    .unwrap()
});

/// Total WebSocket connections (cumulative).
pub static WS_CONNECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "photocache_ws_connections_total",
        "Total WebSocket connections since startup",
    )
    .unwrap()
});

/// WebSocket messages sent by type.
pub static WS_MESSAGES_SENT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "photocache_ws_messages_sent_total",
            "WebSocket messages sent",
        ),
        &["type"],
    )
    .unwrap()
});

// =============================================================================
// Cache Metrics (collected dynamically)
// =============================================================================

/// Favorite photos currently stored.
pub static FAVORITES_STORED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "photocache_favorites_stored",
        "Number of photos marked as favorite",
    )
    .unwrap()
});

/// Recent queries currently stored.
pub static RECENT_QUERIES_STORED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "photocache_recent_queries_stored",
        "Number of recent search terms kept",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let server_metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // HTTP
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        // WebSocket
        Box::new(WS_CONNECTIONS_ACTIVE.clone()),
        Box::new(WS_CONNECTIONS_TOTAL.clone()),
        Box::new(WS_MESSAGES_SENT.clone()),
        // Cache
        Box::new(FAVORITES_STORED.clone()),
        Box::new(RECENT_QUERIES_STORED.clone()),
    ];

    // Core metrics (repository, remote catalog)
    let core_metrics = photocache_core::metrics::all_metrics();

    for metric in server_metrics.into_iter().chain(core_metrics) {
        if let Err(e) = registry.register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the store contents.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let repository = state.repository();

    if let Ok(favorites) = repository.list_favorites() {
        FAVORITES_STORED.set(favorites.len() as i64);
    }

    let limit = repository.config().recent_query_limit;
    if let Ok(queries) = repository.recent_queries(limit) {
        RECENT_QUERIES_STORED.set(queries.len() as i64);
    }
}

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());
static RECENT_QUERY_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/v1/recent/[^/]+$").unwrap());

/// Normalize a path for metric labels (replace IDs and search terms with placeholders).
pub fn normalize_path(path: &str) -> String {
    if RECENT_QUERY_SEGMENT.is_match(path) {
        return "/api/v1/recent/{query}".to_string();
    }
    NUMERIC_SEGMENT.replace_all(path, "/{id}$1").to_string()
}
