// Backend request/response types
//
// Every response is wrapped in `ApiResponse<T>`. Record types use camelCase
// field names because that is what the backend serves to the dashboard; the
// two derived results (`FilterNodesResponse`, `GenerateSubscriptionResponse`)
// come back snake_case and are renamed by `subsman-core`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Code the backend uses for a successful envelope.
pub const SUCCESS_CODE: i64 = 200;

/// Standard backend response envelope.
///
/// ```json
/// { "code": 200, "message": "Success", "data": ... }
/// ```
///
/// `data` is omitted for commands and for empty lists.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

// ── System status ────────────────────────────────────────────────────

/// Aggregate status snapshot from `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    #[serde(default)]
    pub node_stats: NodeStats,
    #[serde(default)]
    pub current_status: CurrentStatus,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Node counts by health bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub slow: u32,
    #[serde(default)]
    pub failed: u32,
}

/// URLs of the subscriptions the backend is currently serving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStatus {
    #[serde(default)]
    pub final_subscription: String,
    #[serde(default)]
    pub merged_subscription: String,
}

/// One generated-subscription history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub time: String,
    pub url: String,
}

// ── Subscriptions ────────────────────────────────────────────────────

/// An imported remote subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub node_count: u32,
    #[serde(default)]
    pub import_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSubscriptionRequest<'a> {
    pub name: &'a str,
    pub url: &'a str,
}

/// Body shared by merge and delete.
#[derive(Debug, Clone, Serialize)]
pub struct IdsRequest<'a> {
    pub ids: &'a [String],
}

// ── Nodes ────────────────────────────────────────────────────────────

/// A single proxy endpoint, with measurements once tested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub alias: String,
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub group: String,
    /// Round-trip delay in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    /// Download speed in MB/s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterNodesRequest {
    pub max_delay: u32,
    pub min_speed: f64,
}

/// Raw `POST /api/node/filter` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterNodesResponse {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub total_nodes: u32,
}

/// Raw `POST /api/node/generate-subscription` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSubscriptionResponse {
    pub sub_url: String,
    #[serde(default)]
    pub node_count: u32,
}

// ── Settings ─────────────────────────────────────────────────────────

/// The settings singleton. Always sent and replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub scheduled_tasks: ScheduledTasks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTasks {
    #[serde(default)]
    pub enabled: bool,
    pub subscription_update: SubscriptionUpdate,
    pub node_check: NodeCheck,
}

/// When the backend re-pulls subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    #[serde(rename = "type")]
    pub schedule: UpdateSchedule,
    /// 0 = Sunday. Only meaningful for weekly schedules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOfDay>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSchedule {
    #[default]
    Daily,
    Weekly,
}

impl fmt::Display for UpdateSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Periodic node re-test cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCheck {
    /// Minutes between checks.
    pub interval: u32,
}

impl Default for NodeCheck {
    fn default() -> Self {
        Self { interval: 240 }
    }
}

// ── Logs ─────────────────────────────────────────────────────────────

/// One operation log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub time: String,
    pub operation: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub page: u32,
    pub page_size: u32,
}

/// Raw `GET /api/logs` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<Log>,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_without_data_is_none() {
        let env: ApiResponse<Vec<Subscription>> =
            serde_json::from_value(json!({ "code": 200, "message": "Success" })).unwrap();
        assert!(env.is_success());
        assert!(env.data.is_none());
    }

    #[test]
    fn node_without_measurements() {
        let node: Node = serde_json::from_value(json!({
            "id": "n1",
            "type": "vmess",
            "alias": "HK 01",
            "address": "1.2.3.4",
            "port": 443,
            "protocol": "ws",
            "group": "hk"
        }))
        .unwrap();
        assert_eq!(node.kind, "vmess");
        assert!(node.delay.is_none());
        assert!(node.speed.is_none());
    }

    #[test]
    fn weekly_settings_wire_shape() {
        let settings = SystemSettings {
            scheduled_tasks: ScheduledTasks {
                enabled: true,
                subscription_update: SubscriptionUpdate {
                    schedule: UpdateSchedule::Weekly,
                    weekday: Some(1),
                    time: Some(TimeOfDay { hour: 3, minute: 30 }),
                },
                node_check: NodeCheck { interval: 60 },
            },
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            value,
            json!({
                "scheduledTasks": {
                    "enabled": true,
                    "subscriptionUpdate": {
                        "type": "weekly",
                        "weekday": 1,
                        "time": { "hour": 3, "minute": 30 }
                    },
                    "nodeCheck": { "interval": 60 }
                }
            })
        );
    }

    #[test]
    fn daily_settings_omit_weekday() {
        let value = serde_json::to_value(SystemSettings::default()).unwrap();
        let update = &value["scheduledTasks"]["subscriptionUpdate"];
        assert_eq!(update["type"], "daily");
        assert!(update.get("weekday").is_none());
    }

    #[test]
    fn filter_request_is_camel_case() {
        let value = serde_json::to_value(FilterNodesRequest {
            max_delay: 400,
            min_speed: 1.5,
        })
        .unwrap();
        assert_eq!(value, json!({ "maxDelay": 400, "minSpeed": 1.5 }));
    }

    #[test]
    fn time_of_day_display_is_zero_padded() {
        assert_eq!(TimeOfDay { hour: 4, minute: 5 }.to_string(), "04:05");
    }
}
