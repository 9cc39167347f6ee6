//! Constants for the pool price oracle
//!
//! Compile-time defaults and the names of the environment variables the
//! watcher is configured from.

/// Default delay between the start of two consecutive queries (in seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Default HTTP request timeout for a single GraphQL query (in seconds)
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;

/// Environment-definition file loaded at startup
pub const ENV_FILE: &str = ".env";

/// Address of the DEX factory contract the oracle is tracking
pub const FACTORY_ADDRESS_KEY: &str = "FACTORY_ADDRESS";

/// GraphQL endpoint of the indexing service
pub const THE_GRAPH_URL_KEY: &str = "THE_GRAPH_URL";

/// Optional override for the polling interval, in whole seconds
pub const POLL_INTERVAL_KEY: &str = "POLL_INTERVAL_SECS";

/// Optional override for the query timeout, in whole seconds
pub const QUERY_TIMEOUT_KEY: &str = "QUERY_TIMEOUT_SECS";

/// Number of latency samples kept for percentile calculation
pub const METRICS_WINDOW: usize = 100;

/// Capacity of the watcher event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Longest response-body excerpt carried in a query error (in characters)
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "pool-price-oracle/0.1.0";
