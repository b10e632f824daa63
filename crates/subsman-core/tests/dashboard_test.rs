#![allow(clippy::unwrap_used)]
// Integration tests for `Dashboard` actions against a wiremock backend.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use subsman_api::ApiClient;
use subsman_core::{
    CoreError, Dashboard, NodeCheck, ScheduledTasks, SubscriptionUpdate, SystemSettings,
    TimeOfDay, UpdateSchedule,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Dashboard) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, Dashboard::with_client(client))
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 200,
        "message": "Success",
        "data": data
    }))
}

fn ok_empty() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 200, "message": "Success" }))
}

fn failure(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 500, "message": message }))
}

fn subscription(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("sub {id}"),
        "type": "clash",
        "url": format!("https://example.com/{id}"),
        "nodeCount": 10,
        "importTime": "2026-10-01 12:00:00"
    })
}

fn node(id: &str) -> serde_json::Value {
    json!({
        "id": id, "type": "vmess", "alias": id, "address": "1.2.3.4",
        "port": 443, "protocol": "ws", "group": "hk", "delay": 80, "speed": 3.2
    })
}

fn weekly_settings(weekday: Option<u8>) -> SystemSettings {
    SystemSettings {
        scheduled_tasks: ScheduledTasks {
            enabled: true,
            subscription_update: SubscriptionUpdate {
                schedule: UpdateSchedule::Weekly,
                weekday,
                time: Some(TimeOfDay { hour: 3, minute: 0 }),
            },
            node_check: NodeCheck { interval: 60 },
        },
    }
}

// ── Subscriptions ───────────────────────────────────────────────────

#[tokio::test]
async fn fetch_subscriptions_replaces_slice() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ok(json!([subscription("s1"), subscription("s2")])))
        .mount(&server)
        .await;

    dashboard.fetch_subscriptions().await.unwrap();
    let subs = dashboard.store().subscriptions_snapshot();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[1].id, "s2");
}

#[tokio::test]
async fn failed_fetch_leaves_subscriptions_unchanged() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ok(json!([subscription("s1")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    dashboard.fetch_subscriptions().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = dashboard.fetch_subscriptions().await;
    assert!(result.is_err());
    let subs = dashboard.store().subscriptions_snapshot();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].id, "s1");
}

#[tokio::test]
async fn transport_timeout_without_configured_limit_has_no_duration() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = ApiClient::with_client(http, Url::parse(&server.uri()).unwrap());
    let dashboard = Dashboard::with_client(client);

    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ok(json!([])).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = dashboard.fetch_subscriptions().await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout { timeout_secs: None }));
    assert_eq!(err.to_string(), "Backend request timed out");
}

#[tokio::test]
async fn import_subscription_refreshes_list() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/subscription/import"))
        .and(body_json(json!({ "name": "home", "url": "https://example.com/s1" })))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ok(json!([subscription("s1")])))
        .expect(1)
        .mount(&server)
        .await;

    dashboard
        .import_subscription("home", "https://example.com/s1")
        .await
        .unwrap();
    assert_eq!(dashboard.store().subscriptions_snapshot().len(), 1);
}

#[tokio::test]
async fn failed_import_skips_refresh() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/subscription/import"))
        .respond_with(failure("unreachable subscription URL"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = dashboard
        .import_subscription("home", "https://example.com/s1")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unreachable subscription URL"));
}

#[tokio::test]
async fn successful_step_then_failed_refresh_propagates() {
    let (server, dashboard) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/subscription/delete"))
        .and(body_json(json!({ "ids": ["s1"] })))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = dashboard.delete_subscriptions(&["s1".to_owned()]).await;
    assert!(matches!(result, Err(CoreError::Backend { .. })));
    assert!(dashboard.store().subscriptions_snapshot().is_empty());
}

#[tokio::test]
async fn merge_refreshes_system_status() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/subscription/merge"))
        .and(body_json(json!({ "ids": ["s1", "s2"] })))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ok(json!({
            "nodeStats": { "total": 0, "current": 0, "slow": 0, "failed": 0 },
            "currentStatus": {
                "finalSubscription": "",
                "mergedSubscription": "http://localhost:3355/sub/merged"
            },
            "history": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    dashboard
        .merge_subscriptions(&["s1".to_owned(), "s2".to_owned()])
        .await
        .unwrap();
    let status = dashboard.store().system_status_snapshot();
    assert_eq!(
        status.as_ref().as_ref().unwrap().current_status.merged_subscription,
        "http://localhost:3355/sub/merged"
    );
}

// ── Nodes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_nodes_raises_loading_for_the_call() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/test"))
        .respond_with(ok_empty().set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/node/list"))
        .respond_with(ok(json!([node("n1")])))
        .mount(&server)
        .await;

    let mut loading = dashboard.store().subscribe_loading();
    let task = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.test_nodes().await }
    });

    loading.wait_for(|busy| *busy).await.unwrap();
    assert!(dashboard.store().is_loading());

    task.await.unwrap().unwrap();
    assert!(!dashboard.store().is_loading());
    assert_eq!(dashboard.store().nodes_snapshot().len(), 1);
}

#[tokio::test]
async fn overlapping_node_tests_keep_loading_until_both_finish() {
    let (server, dashboard) = setup().await;

    // First request is slow, every later one answers at once
    Mock::given(method("POST"))
        .and(path("/api/node/test"))
        .respond_with(ok_empty().set_delay(Duration::from_millis(500)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/node/test"))
        .respond_with(ok_empty())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/node/list"))
        .respond_with(ok(json!([node("n1")])))
        .mount(&server)
        .await;

    let slow = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.test_nodes().await }
    });
    while server.received_requests().await.unwrap_or_default().is_empty() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    dashboard.test_nodes().await.unwrap();
    assert!(dashboard.store().is_loading(), "slow test still running");

    slow.await.unwrap().unwrap();
    assert!(!dashboard.store().is_loading());
}

#[tokio::test]
async fn test_nodes_clears_loading_on_failure() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/test"))
        .respond_with(failure("no nodes imported"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/node/list"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    assert!(dashboard.test_nodes().await.is_err());
    assert!(!dashboard.store().is_loading());
}

#[tokio::test]
async fn test_nodes_clears_loading_when_cancelled() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/test"))
        .respond_with(ok_empty().set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let result = tokio::time::timeout(Duration::from_millis(100), dashboard.test_nodes()).await;
    assert!(result.is_err(), "test_nodes should still be pending");
    assert!(!dashboard.store().is_loading());
}

#[tokio::test]
async fn import_nodes_refreshes_node_list() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/import"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/node/list"))
        .respond_with(ok(json!([node("n1"), node("n2")])))
        .expect(1)
        .mount(&server)
        .await;

    dashboard.import_nodes().await.unwrap();
    assert_eq!(dashboard.store().nodes_snapshot().len(), 2);
}

#[tokio::test]
async fn filter_nodes_returns_renamed_result_without_touching_store() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/filter"))
        .and(body_json(json!({ "maxDelay": 400, "minSpeed": 1.0 })))
        .respond_with(ok(json!({ "nodes": [node("n1")], "total_nodes": 1 })))
        .mount(&server)
        .await;

    let filtered = dashboard.filter_nodes(400, 1.0).await.unwrap();
    assert_eq!(filtered.total_nodes, 1);
    assert_eq!(filtered.nodes[0].id, "n1");
    assert!(dashboard.store().nodes_snapshot().is_empty());
}

#[tokio::test]
async fn filter_nodes_rejects_non_finite_speed_before_sending() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/filter"))
        .respond_with(ok(json!({ "nodes": [], "total_nodes": 0 })))
        .expect(0)
        .mount(&server)
        .await;

    for speed in [f64::INFINITY, f64::NAN, -1.0] {
        let err = dashboard.filter_nodes(400, speed).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }), "{speed}");
    }
}

#[tokio::test]
async fn generate_subscription_renames_fields() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/generate-subscription"))
        .respond_with(ok(json!({
            "sub_url": "http://localhost:3355/sub/final",
            "node_count": 4
        })))
        .mount(&server)
        .await;

    let generated = dashboard.generate_subscription().await.unwrap();
    assert_eq!(generated.url, "http://localhost:3355/sub/final");
    assert_eq!(generated.node_count, 4);
}

// ── Settings ────────────────────────────────────────────────────────

#[tokio::test]
async fn update_settings_stores_sent_value() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;

    let settings = weekly_settings(Some(1));
    dashboard.update_settings(settings.clone()).await.unwrap();
    assert_eq!(
        dashboard.store().settings_snapshot().as_ref(),
        &Some(settings)
    );
}

#[tokio::test]
async fn invalid_settings_never_reach_backend() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .respond_with(ok_empty())
        .expect(0)
        .mount(&server)
        .await;

    let result = dashboard.update_settings(weekly_settings(None)).await;
    assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    assert!(dashboard.store().settings_snapshot().is_none());
}

#[tokio::test]
async fn fetch_settings_replaces_slice() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ok(json!({
            "scheduledTasks": {
                "enabled": true,
                "subscriptionUpdate": { "type": "daily", "time": { "hour": 5, "minute": 30 } },
                "nodeCheck": { "interval": 90 }
            }
        })))
        .mount(&server)
        .await;

    dashboard.fetch_settings().await.unwrap();
    let snapshot = dashboard.store().settings_snapshot();
    let settings = snapshot.as_ref().as_ref().unwrap();
    assert_eq!(settings.scheduled_tasks.node_check.interval, 90);
}

// ── Logs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_logs_returns_page_and_fills_store() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "20"))
        .respond_with(ok(json!({
            "logs": [
                { "time": "2026-10-01 03:00:00", "operation": "import nodes" },
                { "time": "2026-10-01 03:05:00", "operation": "test nodes" }
            ],
            "total": 42
        })))
        .mount(&server)
        .await;

    let page = dashboard.fetch_logs(1, 20).await.unwrap();
    assert_eq!(page.total, 42);
    assert_eq!(dashboard.store().logs_snapshot().len(), 2);
}

#[tokio::test]
async fn clear_logs_empties_store() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ok(json!({
            "logs": [{ "time": "2026-10-01 03:00:00", "operation": "merge" }],
            "total": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/logs"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;

    dashboard.fetch_logs(1, 20).await.unwrap();
    dashboard.clear_logs().await.unwrap();
    assert!(dashboard.store().logs_snapshot().is_empty());
}
