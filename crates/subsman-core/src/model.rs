// ── Domain model ──
//
// Backend records are used as-is from `subsman-api`. The derived results
// below are the shapes consumers see after the snake_case backend payloads
// have been renamed.

use serde::{Deserialize, Serialize};

use subsman_api::models::{FilterNodesResponse, GenerateSubscriptionResponse, LogsResponse};

pub use subsman_api::models::{
    CurrentStatus, HistoryEntry, Log, Node, NodeCheck, NodeStats, ScheduledTasks, Subscription,
    SubscriptionUpdate, SystemSettings, SystemStatus, TimeOfDay, UpdateSchedule,
};

/// Nodes that passed a delay/speed filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredNodes {
    pub nodes: Vec<Node>,
    /// Number of nodes that passed, as reported by the backend.
    pub total_nodes: u32,
}

impl From<FilterNodesResponse> for FilteredNodes {
    fn from(raw: FilterNodesResponse) -> Self {
        Self {
            nodes: raw.nodes,
            total_nodes: raw.total_nodes,
        }
    }
}

/// The final subscription produced from the last filter result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSubscription {
    pub url: String,
    pub node_count: u32,
}

impl From<GenerateSubscriptionResponse> for GeneratedSubscription {
    fn from(raw: GenerateSubscriptionResponse) -> Self {
        Self {
            url: raw.sub_url,
            node_count: raw.node_count,
        }
    }
}

/// One page of operation logs plus the overall count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPage {
    pub logs: Vec<Log>,
    pub total: u64,
}

impl From<LogsResponse> for LogPage {
    fn from(raw: LogsResponse) -> Self {
        Self {
            logs: raw.logs,
            total: raw.total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn filtered_nodes_serialize_camel_case() {
        let filtered = FilteredNodes::from(FilterNodesResponse {
            nodes: Vec::new(),
            total_nodes: 3,
        });
        assert_eq!(
            serde_json::to_value(&filtered).unwrap(),
            json!({ "nodes": [], "totalNodes": 3 })
        );
    }

    #[test]
    fn generated_subscription_renames_sub_url() {
        let generated = GeneratedSubscription::from(GenerateSubscriptionResponse {
            sub_url: "http://localhost:3355/sub/final".into(),
            node_count: 12,
        });
        assert_eq!(generated.url, "http://localhost:3355/sub/final");
        assert_eq!(
            serde_json::to_value(&generated).unwrap()["nodeCount"],
            json!(12)
        );
    }
}
