//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Fetch orchestration (results, stale drops)
//! - Session persistence (saves, loads)
//! - Autocomplete (lookup outcomes)
//! - Backend requests (durations per endpoint)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Catalog fetches total by result.
pub static FETCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_fetches_total", "Total catalog page fetches"),
        &["result"], // "success", "error"
    )
    .unwrap()
});

/// Stale fetch results dropped by the orchestrator.
pub static STALE_RESULTS_DROPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_stale_results_dropped_total",
        "Fetch results discarded because a newer fetch was issued",
    )
    .unwrap()
});

/// Session snapshot saves by result.
pub static SESSION_SAVES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_session_saves_total", "Total session snapshot saves"),
        &["result"], // "success", "error"
    )
    .unwrap()
});

/// Session snapshot loads by outcome.
pub static SESSION_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_session_loads_total", "Total session snapshot loads"),
        &["result"], // "restored", "empty", "error"
    )
    .unwrap()
});

/// Autocomplete lookups by outcome.
pub static AUTOCOMPLETE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_autocomplete_lookups_total",
            "Total suggestion lookups",
        ),
        &["outcome"], // "hit", "miss", "short", "superseded", "error"
    )
    .unwrap()
});

/// Backend request duration per endpoint.
pub static REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "marquee_request_duration_seconds",
            "Duration of backend requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"], // "movies", "genres", "session_load", "session_save", "autocomplete"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(FETCHES_TOTAL.clone()),
        Box::new(STALE_RESULTS_DROPPED.clone()),
        Box::new(SESSION_SAVES.clone()),
        Box::new(SESSION_LOADS.clone()),
        Box::new(AUTOCOMPLETE_LOOKUPS.clone()),
        Box::new(REQUEST_DURATION.clone()),
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
    }
}
