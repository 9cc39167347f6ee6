//! Query metrics collection and reporting
//!
//! Tracks latency percentiles, success rate and failure categories for the
//! watcher's queries.

use crate::{constants::METRICS_WINDOW, error::QueryErrorKind};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::RwLock;

/// Snapshot of query metrics for one endpoint
#[derive(Debug, Clone)]
pub struct QueryMetrics {
    /// Endpoint the queries were issued against
    pub endpoint: String,
    /// 50th percentile latency of successful queries in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful queries in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of queries issued
    pub total_queries: u64,
    /// Number of failed queries
    pub failed_queries: u64,
    /// Failed queries per category
    pub failures_by_kind: HashMap<QueryErrorKind, u64>,
}

impl QueryMetrics {
    /// Creates metrics with no data
    pub fn empty(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_queries: 0,
            failed_queries: 0,
            failures_by_kind: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

#[derive(Debug, Default)]
struct Counters {
    total: u64,
    failed: u64,
    by_kind: HashMap<QueryErrorKind, u64>,
}

/// Collects and computes metrics for the watcher's queries
pub struct MetricsCollector {
    endpoint: String,
    /// Rolling window of latency samples
    samples: RwLock<VecDeque<LatencySample>>,
    /// Lifetime counters
    counters: RwLock<Counters>,
}

impl MetricsCollector {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            samples: RwLock::new(VecDeque::with_capacity(METRICS_WINDOW)),
            counters: RwLock::new(Counters::default()),
        }
    }

    /// Records a query with its duration and failure category, if any
    pub async fn record_query(&self, duration: Duration, failure: Option<QueryErrorKind>) {
        let duration_ms = duration.as_secs_f64() * 1000.0;

        {
            let mut counters = self.counters.write().await;
            counters.total += 1;
            if let Some(kind) = failure {
                counters.failed += 1;
                *counters.by_kind.entry(kind).or_insert(0) += 1;
            }
        }

        let mut samples = self.samples.write().await;
        if samples.len() >= METRICS_WINDOW {
            samples.pop_front();
        }
        samples.push_back(LatencySample {
            duration_ms,
            success: failure.is_none(),
        });
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> QueryMetrics {
        let samples = self.samples.read().await;
        let counters = self.counters.read().await;

        if samples.is_empty() {
            return QueryMetrics::empty(&self.endpoint);
        }

        let mut latencies: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let success_rate = if counters.total > 0 {
            (counters.total - counters.failed) as f64 / counters.total as f64
        } else {
            1.0
        };

        QueryMetrics {
            endpoint: self.endpoint.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate,
            total_queries: counters.total,
            failed_queries: counters.failed,
            failures_by_kind: counters.by_kind.clone(),
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
