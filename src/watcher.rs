//! Polling watcher
//!
//! Issues one GraphQL query per polling interval against the configured
//! endpoint, reports the outcome and keeps going until cancelled.

use crate::{
    client::QueryClient,
    clients::GraphQlClient,
    config::OracleConfig,
    constants::EVENT_CHANNEL_CAPACITY,
    error::QueryError,
    metrics::{MetricsCollector, QueryMetrics},
    query::QueryDocument,
    types::{QueryResult, WatcherEvent, WatcherState},
};
use chrono::Utc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Polling watcher bound to a single GraphQL endpoint
///
/// # Example
/// ```no_run
/// use pool_price_oracle::{OracleConfig, Watcher};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = OracleConfig::from_env()?;
/// let watcher = Watcher::new(config)?;
/// watcher.start(CancellationToken::new()).await;
/// # Ok(())
/// # }
/// ```
pub struct Watcher {
    config: OracleConfig,
    client: Arc<dyn QueryClient>,
    query: QueryDocument,
    metrics: Arc<MetricsCollector>,
    events: broadcast::Sender<WatcherEvent>,
    state: AtomicU8,
}

impl Watcher {
    /// Creates a watcher with an HTTP GraphQL client bound to
    /// `config.the_graph_url()`
    ///
    /// No network I/O happens here. The only failure is the HTTP client
    /// itself failing to initialize.
    pub fn new(config: OracleConfig) -> Result<Self, QueryError> {
        let client = GraphQlClient::new(config.the_graph_url(), config.request_timeout())?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Creates a watcher with a custom query client
    pub fn with_client(config: OracleConfig, client: Arc<dyn QueryClient>) -> Self {
        let metrics = Arc::new(MetricsCollector::new(client.endpoint()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            config,
            client,
            query: QueryDocument::default(),
            metrics,
            events,
            state: AtomicU8::new(WatcherState::Initialized.as_u8()),
        }
    }

    /// Selects the query document issued on every iteration
    pub fn with_query(mut self, query: QueryDocument) -> Self {
        self.query = query;
        self
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn query(&self) -> QueryDocument {
        self.query
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn state(&self) -> WatcherState {
        WatcherState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: WatcherState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Subscribes to the events emitted after every query
    pub fn subscribe(&self) -> broadcast::Receiver<WatcherEvent> {
        self.events.subscribe()
    }

    /// Gets query metrics including latency percentiles and failure counts
    pub async fn metrics(&self) -> QueryMetrics {
        self.metrics.get_metrics().await
    }

    /// Runs the polling loop until `shutdown` is cancelled
    ///
    /// The first query is issued immediately, then one per
    /// `poll_interval`, measured start to start. Query failures are
    /// reported and never end the loop. Cancellation is honored both while
    /// waiting and while a query is in flight.
    pub async fn start(&self, shutdown: CancellationToken) {
        self.set_state(WatcherState::Running);

        tracing::info!(
            endpoint = %self.endpoint(),
            query = %self.query,
            factory_address = %self.config.factory_address(),
            poll_interval_ms = self.config.poll_interval().as_millis() as u64,
            "Watcher started"
        );

        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = self.poll_once() => {}
            }

            let metrics = self.metrics.get_metrics().await;
            tracing::debug!(
                total_queries = metrics.total_queries,
                failed_queries = metrics.failed_queries,
                success_rate = metrics.success_rate,
                latency_p50_ms = metrics.latency_p50_ms,
                "Watcher iteration complete"
            );
        }

        self.set_state(WatcherState::Stopped);
        tracing::info!(endpoint = %self.endpoint(), "Watcher stopped");
    }

    /// Starts the polling loop on a background task
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.start(shutdown).await })
    }

    /// Issues a single query and reports its outcome
    ///
    /// This is one iteration of the polling loop; it can also be called
    /// directly for an on-demand refresh.
    pub async fn poll_once(&self) -> Result<QueryResult, QueryError> {
        let start = Instant::now();
        let outcome = self.client.query(self.query).await;
        let latency = start.elapsed();

        let event = match &outcome {
            Ok(result) => {
                let summary = result.summary();
                tracing::info!(
                    endpoint = %self.endpoint(),
                    query = %self.query,
                    items = result.item_count(),
                    latency_ms = latency.as_millis() as u64,
                    "Query succeeded"
                );
                self.metrics.record_query(latency, None).await;

                WatcherEvent::QuerySucceeded {
                    id: Uuid::new_v4(),
                    endpoint: self.endpoint().to_string(),
                    summary,
                    latency_ms: latency.as_millis() as u64,
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.endpoint(),
                    query = %self.query,
                    kind = %e.kind(),
                    error = %e,
                    "Query failed"
                );
                self.metrics.record_query(latency, Some(e.kind())).await;

                WatcherEvent::QueryFailed {
                    id: Uuid::new_v4(),
                    endpoint: self.endpoint().to_string(),
                    kind: e.kind(),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                }
            }
        };

        // No subscribers is fine
        let _ = self.events.send(event);

        outcome
    }
}
