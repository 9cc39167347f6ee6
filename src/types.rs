//! Types for the pool price oracle watcher

use crate::error::QueryErrorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Result of a successful GraphQL query
///
/// The `data` object is kept untyped; the watcher only needs to know that the
/// query succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// The `data` member of the GraphQL response
    pub data: Value,

    /// When the response was received
    pub received_at: DateTime<Utc>,
}

impl QueryResult {
    /// Create a new result stamped with the current time
    pub fn new(data: Value) -> Self {
        Self {
            data,
            received_at: Utc::now(),
        }
    }

    /// Item count per top-level field
    ///
    /// Lists count their elements, null counts as zero and any other value
    /// as one.
    pub fn summary(&self) -> BTreeMap<String, usize> {
        let mut summary = BTreeMap::new();

        if let Value::Object(fields) = &self.data {
            for (name, value) in fields {
                let count = match value {
                    Value::Array(items) => items.len(),
                    Value::Null => 0,
                    _ => 1,
                };
                summary.insert(name.clone(), count);
            }
        }

        summary
    }

    /// Total number of items across all top-level fields
    pub fn item_count(&self) -> usize {
        self.summary().values().sum()
    }
}

/// Lifecycle state of a watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatcherState {
    /// Client bound, loop not yet entered
    Initialized,
    /// Polling loop active
    Running,
    /// Loop exited after cancellation
    Stopped,
}

impl WatcherState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            WatcherState::Initialized => 0,
            WatcherState::Running => 1,
            WatcherState::Stopped => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => WatcherState::Initialized,
            1 => WatcherState::Running,
            _ => WatcherState::Stopped,
        }
    }
}

/// Watcher events, broadcast after every query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatcherEvent {
    /// Query returned data
    QuerySucceeded {
        id: Uuid,
        endpoint: String,
        summary: BTreeMap<String, usize>,
        latency_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// Query failed; the loop carries on
    QueryFailed {
        id: Uuid,
        endpoint: String,
        kind: QueryErrorKind,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl WatcherEvent {
    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            WatcherEvent::QuerySucceeded { id, .. } => *id,
            WatcherEvent::QueryFailed { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            WatcherEvent::QuerySucceeded { .. } => "QUERY_SUCCEEDED",
            WatcherEvent::QueryFailed { .. } => "QUERY_FAILED",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WatcherEvent::QuerySucceeded { .. })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            WatcherEvent::QuerySucceeded { timestamp, .. } => *timestamp,
            WatcherEvent::QueryFailed { timestamp, .. } => *timestamp,
        }
    }
}

impl std::fmt::Display for WatcherEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatcherEvent::QuerySucceeded {
                endpoint, summary, ..
            } => {
                write!(f, "Query succeeded against {}: {:?}", endpoint, summary)
            }
            WatcherEvent::QueryFailed {
                endpoint,
                kind,
                error_message,
                ..
            } => {
                write!(
                    f,
                    "Query failed against {} ({}): {}",
                    endpoint, kind, error_message
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_counts_top_level_fields() {
        let result = QueryResult::new(json!({
            "lockers": [{"id": "1"}, {"id": "2"}],
            "pools": [],
            "meta": {"block": 12},
            "missing": null
        }));

        let summary = result.summary();
        assert_eq!(summary["lockers"], 2);
        assert_eq!(summary["pools"], 0);
        assert_eq!(summary["meta"], 1);
        assert_eq!(summary["missing"], 0);
        assert_eq!(result.item_count(), 3);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = WatcherEvent::QueryFailed {
            id: Uuid::new_v4(),
            endpoint: "http://mock-endpoint".to_string(),
            kind: QueryErrorKind::Endpoint,
            error_message: "HTTP 500".to_string(),
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "QUERY_FAILED");
        assert_eq!(value["kind"], "endpoint");
        assert_eq!(event.event_type(), "QUERY_FAILED");
        assert!(!event.is_success());
    }

    #[test]
    fn test_state_round_trips_through_u8() {
        for state in [
            WatcherState::Initialized,
            WatcherState::Running,
            WatcherState::Stopped,
        ] {
            assert_eq!(WatcherState::from_u8(state.as_u8()), state);
        }
    }
}
