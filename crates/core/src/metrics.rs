//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Query engine (queries by mode and outcome)
//! - Normalizer (skipped records)
//! - External services (RAWG)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Query Engine Metrics
// =============================================================================

/// Catalog queries total by mode and result.
pub static CATALOG_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("playaxis_catalog_queries_total", "Total catalog queries"),
        &["mode", "result"], // mode: "local", "remote"; result: "success" or error kind
    )
    .unwrap()
});

/// Raw records skipped during normalization.
pub static MALFORMED_RECORDS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "playaxis_malformed_records_total",
            "Total raw records skipped because they lack an id or a name",
        ),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "playaxis_external_service_duration_seconds",
            "Duration of external service requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "playaxis_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_QUERIES.clone()),
        Box::new(MALFORMED_RECORDS.clone()),
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        CATALOG_QUERIES.with_label_values(&["local", "success"]).inc();
        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"playaxis_catalog_queries_total".to_string()));
    }
}
