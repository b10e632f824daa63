#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use subsman_api::models::{
    NodeCheck, ScheduledTasks, SubscriptionUpdate, SystemSettings, TimeOfDay, UpdateSchedule,
};
use subsman_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
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

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ok(json!({
            "nodeStats": { "total": 120, "current": 80, "slow": 25, "failed": 15 },
            "currentStatus": {
                "finalSubscription": "http://localhost:3355/sub/final",
                "mergedSubscription": "http://localhost:3355/sub/merged"
            },
            "history": [
                { "time": "2026-10-01 03:00:00", "url": "http://localhost:3355/sub/final" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();
    assert_eq!(status.node_stats.total, 120);
    assert_eq!(status.node_stats.failed, 15);
    assert_eq!(
        status.current_status.merged_subscription,
        "http://localhost:3355/sub/merged"
    );
    assert_eq!(status.history.len(), 1);
}

#[tokio::test]
async fn test_get_status_without_data_is_missing_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ok_empty())
        .mount(&server)
        .await;

    let result = client.get_status().await;
    assert!(
        matches!(result, Err(Error::MissingData { .. })),
        "expected MissingData error, got: {result:?}"
    );
}

// ── Subscriptions ───────────────────────────────────────────────────

#[tokio::test]
async fn test_import_subscription_sends_name_and_url() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/subscription/import"))
        .and(body_json(json!({ "name": "home", "url": "https://example.com/sub" })))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;

    let data = client
        .import_subscription("home", "https://example.com/sub")
        .await
        .unwrap();
    assert!(data.is_null());
}

#[tokio::test]
async fn test_list_subscriptions() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ok(json!([{
            "id": "s1",
            "name": "home",
            "type": "clash",
            "url": "https://example.com/sub",
            "nodeCount": 42,
            "importTime": "2026-10-01 12:00:00"
        }])))
        .mount(&server)
        .await;

    let subs = client.list_subscriptions().await.unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].kind, "clash");
    assert_eq!(subs[0].node_count, 42);
}

#[tokio::test]
async fn test_list_subscriptions_without_data_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subscription/list"))
        .respond_with(ok_empty())
        .mount(&server)
        .await;

    assert!(client.list_subscriptions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_merge_subscriptions_sends_ids() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/subscription/merge"))
        .and(body_json(json!({ "ids": ["s1", "s2"] })))
        .respond_with(ok(json!({ "url": "http://localhost:3355/sub/merged" })))
        .expect(1)
        .mount(&server)
        .await;

    let ids = vec!["s1".to_owned(), "s2".to_owned()];
    let data = client.merge_subscriptions(&ids).await.unwrap();
    assert_eq!(data["url"], "http://localhost:3355/sub/merged");
}

#[tokio::test]
async fn test_delete_subscriptions_uses_delete_with_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/subscription/delete"))
        .and(body_json(json!({ "ids": ["s1"] })))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_subscriptions(&["s1".to_owned()])
        .await
        .unwrap();
}

// ── Nodes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_nodes_with_partial_measurements() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/node/list"))
        .respond_with(ok(json!([
            {
                "id": "n1", "type": "vmess", "alias": "HK 01", "address": "1.2.3.4",
                "port": 443, "protocol": "ws", "group": "hk", "delay": 120, "speed": 5.5
            },
            {
                "id": "n2", "type": "ss", "alias": "JP 01", "address": "5.6.7.8",
                "port": 8388, "protocol": "tcp", "group": "jp"
            }
        ])))
        .mount(&server)
        .await;

    let nodes = client.list_nodes().await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].delay, Some(120));
    assert_eq!(nodes[0].speed, Some(5.5));
    assert_eq!(nodes[1].delay, None);
}

#[tokio::test]
async fn test_import_and_test_nodes_are_bodiless_posts() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/import"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/node/test"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;

    client.import_nodes().await.unwrap();
    client.test_nodes().await.unwrap();
}

#[tokio::test]
async fn test_filter_nodes_sends_camel_case_thresholds() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/filter"))
        .and(body_json(json!({ "maxDelay": 300, "minSpeed": 2.0 })))
        .respond_with(ok(json!({
            "nodes": [{
                "id": "n1", "type": "vmess", "alias": "HK 01", "address": "1.2.3.4",
                "port": 443, "protocol": "ws", "group": "hk", "delay": 120, "speed": 5.5
            }],
            "total_nodes": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filtered = client.filter_nodes(300, 2.0).await.unwrap();
    assert_eq!(filtered.total_nodes, 1);
    assert_eq!(filtered.nodes[0].id, "n1");
}

#[tokio::test]
async fn test_generate_subscription() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/generate-subscription"))
        .respond_with(ok(json!({
            "sub_url": "http://localhost:3355/sub/final",
            "node_count": 7
        })))
        .mount(&server)
        .await;

    let generated = client.generate_subscription().await.unwrap();
    assert_eq!(generated.sub_url, "http://localhost:3355/sub/final");
    assert_eq!(generated.node_count, 7);
}

// ── Settings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_settings_posts_full_document() {
    let (server, client) = setup().await;

    let settings = SystemSettings {
        scheduled_tasks: ScheduledTasks {
            enabled: true,
            subscription_update: SubscriptionUpdate {
                schedule: UpdateSchedule::Daily,
                weekday: None,
                time: Some(TimeOfDay { hour: 4, minute: 0 }),
            },
            node_check: NodeCheck { interval: 120 },
        },
    };

    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .and(body_json(json!({
            "scheduledTasks": {
                "enabled": true,
                "subscriptionUpdate": { "type": "daily", "time": { "hour": 4, "minute": 0 } },
                "nodeCheck": { "interval": 120 }
            }
        })))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;

    client.update_settings(&settings).await.unwrap();
}

#[tokio::test]
async fn test_get_settings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ok(json!({
            "scheduledTasks": {
                "enabled": false,
                "subscriptionUpdate": {
                    "type": "weekly", "weekday": 0, "time": { "hour": 2, "minute": 15 }
                },
                "nodeCheck": { "interval": 240 }
            }
        })))
        .mount(&server)
        .await;

    let settings = client.get_settings().await.unwrap();
    let update = settings.scheduled_tasks.subscription_update;
    assert_eq!(update.schedule, UpdateSchedule::Weekly);
    assert_eq!(update.weekday, Some(0));
}

// ── Logs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_logs_sends_paging_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "50"))
        .respond_with(ok(json!({
            "logs": [{ "time": "2026-10-01 03:00:00", "operation": "node test finished" }],
            "total": 51
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.get_logs(2, 50).await.unwrap();
    assert_eq!(page.total, 51);
    assert_eq!(page.logs[0].operation, "node test finished");
}

#[tokio::test]
async fn test_clear_logs() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/logs"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&server)
        .await;

    client.clear_logs().await.unwrap();
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_code_is_backend_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/import"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 500,
            "message": "no merged subscription"
        })))
        .mount(&server)
        .await;

    let err = client.import_nodes().await.unwrap_err();
    assert_eq!(err.backend_code(), Some(500));
    assert!(err.to_string().contains("no merged subscription"));
}

#[tokio::test]
async fn test_http_error_with_envelope_keeps_backend_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "message": "settings not initialised"
        })))
        .mount(&server)
        .await;

    let err = client.get_settings().await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, Error::Backend { code: 404, .. }));
}

#[tokio::test]
async fn test_http_error_without_envelope_is_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/node/list"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.list_nodes().await.unwrap_err();
    assert!(err.is_transient());
    assert!(
        matches!(err, Error::Http { status: 502, .. }),
        "expected Http error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
