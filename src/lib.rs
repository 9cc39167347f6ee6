//! # Pool Price Oracle
//!
//! Polls a DEX indexing service (The Graph) over GraphQL for liquidity-pool
//! data. This is the groundwork of a price oracle: today the watcher only
//! issues the query and reports the result; no price is derived yet.
//!
//! ## Usage
//!
//! ```no_run
//! use pool_price_oracle::{config, OracleConfig, Watcher};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! config::load_env_file(".env")?;
//! let watcher = Watcher::new(OracleConfig::from_env()?)?;
//!
//! let shutdown = CancellationToken::new();
//! watcher.start(shutdown).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! load_env_file(".env")
//!     ↓
//! OracleConfig::from_env()   (FACTORY_ADDRESS, THE_GRAPH_URL required)
//!     ↓
//! Watcher::new               (binds GraphQlClient, no I/O)
//!     ↓
//! Watcher::start             (query → report → wait interval, until cancelled)
//! ```
//!
//! ## Error Handling
//!
//! Configuration errors ([`ConfigError`]) are fatal at startup. Query errors
//! ([`QueryError`]) are logged, counted and broadcast as
//! [`WatcherEvent::QueryFailed`]; the loop always continues.

pub mod client;
pub mod clients;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod query;
pub mod telemetry;
pub mod types;
pub mod watcher;

// Re-export commonly used types
pub use client::QueryClient;
pub use clients::GraphQlClient;
pub use config::{EnvOptions, OracleConfig};
pub use error::{ConfigError, QueryError, QueryErrorKind};
pub use metrics::QueryMetrics;
pub use query::QueryDocument;
pub use types::{QueryResult, WatcherEvent, WatcherState};
pub use watcher::Watcher;
