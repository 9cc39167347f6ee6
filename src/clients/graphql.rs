//! HTTP GraphQL client implementation

use crate::{
    client::QueryClient,
    constants::{MAX_ERROR_BODY_CHARS, USER_AGENT},
    error::QueryError,
    query::QueryDocument,
    types::QueryResult,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// GraphQL-over-HTTP request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
}

/// GraphQL-over-HTTP response body
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// Cuts a response body down to a bounded excerpt for error messages
fn excerpt(body: &str) -> String {
    let total_chars = body.chars().count();
    if total_chars <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }

    let prefix: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{}... ({} chars total)", prefix, total_chars)
}

/// Client bound to a single GraphQL endpoint
pub struct GraphQlClient {
    client: Client,
    endpoint: String,
}

impl GraphQlClient {
    /// Creates a client bound to `endpoint`
    ///
    /// No request is made here. Every query is bounded by `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(QueryError::Network)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Turns a decoded response body into a result or an endpoint error
    fn parse_response(&self, response: GraphQlResponse) -> Result<QueryResult, QueryError> {
        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(QueryError::Endpoint(messages));
        }

        match response.data {
            Some(Value::Null) | None => Err(QueryError::MalformedResponse(
                "Response contains neither data nor errors".to_string(),
            )),
            Some(data) => Ok(QueryResult::new(data)),
        }
    }
}

#[async_trait]
impl QueryClient for GraphQlClient {
    async fn query(&self, query: QueryDocument) -> Result<QueryResult, QueryError> {
        tracing::debug!(endpoint = %self.endpoint, query = %query, "Issuing GraphQL query");

        let request_body = GraphQlRequest {
            query: query.document(),
            operation_name: query.operation_name(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await
            .map_err(QueryError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Endpoint(format!(
                "HTTP {}: {}",
                status,
                excerpt(&response.text().await.unwrap_or_default())
            )));
        }

        let response_text = response.text().await.map_err(QueryError::from_transport)?;

        let graphql_response: GraphQlResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                QueryError::MalformedResponse(format!(
                    "Failed to parse GraphQL response: {}. Response: {}",
                    e,
                    excerpt(&response_text)
                ))
            })?;

        self.parse_response(graphql_response)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
