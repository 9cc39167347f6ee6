//! Query client abstraction for the remote GraphQL endpoint

use crate::{error::QueryError, query::QueryDocument, types::QueryResult};
use async_trait::async_trait;

/// Trait for clients bound to a GraphQL endpoint
///
/// Implementations issue a single query per call and classify failures into
/// [`QueryError`] variants. They never retry.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Issues `query` against the bound endpoint
    ///
    /// # Returns
    /// The `data` object of the response, or the reason the query failed
    async fn query(&self, query: QueryDocument) -> Result<QueryResult, QueryError>;

    /// Returns the endpoint this client is bound to
    fn endpoint(&self) -> &str;
}
