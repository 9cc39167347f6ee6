//! GraphQL query documents compiled into the watcher
//!
//! Each document is a fixed string. The watcher is bound to one of them at
//! construction and never changes it while running.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locker registry ids
const LOCKERS_QUERY: &str = r#"query Lockers {
  lockers {
    id
  }
}"#;

/// First hundred pools with both token prices
const FIRST_100_POOLS_QUERY: &str = r#"query First100Pools {
  pools(first: 100) {
    price0
    price1
    id
    token0 {
      name
      symbol
      id
    }
    token1 {
      name
      symbol
      id
    }
  }
}"#;

/// Liquidity and prices for a single token pair
const POOL_SEARCH_QUERY: &str = r#"query PoolSearch {
  poolSearch(text: "*", where: {token1: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", token0: "0x682a21d52451bb93e4bda3c557e46e0016d0edb0"}) {
    activeLiquidity
    amount0
    amount1
    price0
    price1
  }
}"#;

/// The query documents the watcher knows how to issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDocument {
    /// Locker registry; the document issued by default
    #[default]
    Lockers,
    /// `pools(first: 100)` with token metadata
    First100Pools,
    /// `poolSearch` for a fixed token pair
    PoolSearch,
}

impl QueryDocument {
    /// Returns the GraphQL source text
    pub fn document(&self) -> &'static str {
        match self {
            QueryDocument::Lockers => LOCKERS_QUERY,
            QueryDocument::First100Pools => FIRST_100_POOLS_QUERY,
            QueryDocument::PoolSearch => POOL_SEARCH_QUERY,
        }
    }

    /// Returns the GraphQL operation name
    pub fn operation_name(&self) -> &'static str {
        match self {
            QueryDocument::Lockers => "Lockers",
            QueryDocument::First100Pools => "First100Pools",
            QueryDocument::PoolSearch => "PoolSearch",
        }
    }

    pub fn all() -> &'static [QueryDocument] {
        &[
            QueryDocument::Lockers,
            QueryDocument::First100Pools,
            QueryDocument::PoolSearch,
        ]
    }
}

impl fmt::Display for QueryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation_name())
    }
}
