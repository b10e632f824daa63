//! Data bridge: connects [`DashboardStore`] streams to TUI actions.
//!
//! Runs as a background task over a [`StoreFeeds`] taken up front. Each
//! change to a store slice or the loading flag becomes an [`Action`] on the
//! TUI's action channel.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use subsman_core::{
    DashboardStore, Log, Node, SliceStream, Subscription, SystemSettings, SystemStatus,
};

use crate::action::Action;

/// Receivers for every store slice plus the loading flag.
///
/// Take these before the first screen is built: anything written to the
/// store after `subscribe` returns reaches the bridge, even if the bridge
/// task has not been polled yet.
pub struct StoreFeeds {
    status: SliceStream<Option<SystemStatus>>,
    subscriptions: SliceStream<Vec<Subscription>>,
    nodes: SliceStream<Vec<Node>>,
    settings: SliceStream<Option<SystemSettings>>,
    logs: SliceStream<Vec<Log>>,
    loading: watch::Receiver<bool>,
}

impl StoreFeeds {
    pub fn subscribe(store: &DashboardStore) -> Self {
        Self {
            status: store.subscribe_system_status(),
            subscriptions: store.subscribe_subscriptions(),
            nodes: store.subscribe_nodes(),
            settings: store.subscribe_settings(),
            logs: store.subscribe_logs(),
            loading: store.subscribe_loading(),
        }
    }
}

/// Forward store changes to the TUI until cancelled.
///
/// Screens seed themselves from snapshots when the router builds them, so
/// only changes made after [`StoreFeeds::subscribe`] are forwarded.
pub async fn spawn_data_bridge(
    feeds: StoreFeeds,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let StoreFeeds {
        mut status,
        mut subscriptions,
        mut nodes,
        mut settings,
        mut logs,
        mut loading,
    } = feeds;

    loop {
        let action = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(s) = status.changed() => Action::StatusUpdated(s),
            Some(s) = subscriptions.changed() => Action::SubscriptionsUpdated(s),
            Some(n) = nodes.changed() => {
                debug!(count = n.len(), "dispatching NodesUpdated");
                Action::NodesUpdated(n)
            }
            Some(s) = settings.changed() => Action::SettingsUpdated(s),
            Some(l) = logs.changed() => Action::LogsUpdated(l),
            Ok(()) = loading.changed() => Action::LoadingChanged(*loading.borrow_and_update()),
            else => break,
        };

        if action_tx.send(action).is_err() {
            break;
        }
    }

    debug!("data bridge shut down");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use subsman_core::{ClientConfig, Dashboard};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn stops_when_cancelled() {
        let store = DashboardStore::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(spawn_data_bridge(
            StoreFeeds::subscribe(&store),
            tx,
            cancel.clone(),
        ));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn forwards_changes_made_before_the_task_starts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/subscription/list"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"code":200,"message":"Success","data":[]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        let config = ClientConfig::from_url(&server.uri()).unwrap();
        let dashboard = Dashboard::new(&config).unwrap();

        let feeds = StoreFeeds::subscribe(dashboard.store());
        dashboard.fetch_subscriptions().await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(spawn_data_bridge(feeds, tx, cancel.clone()));

        let action = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(action, Action::SubscriptionsUpdated(s) if s.is_empty()));

        cancel.cancel();
        task.await.unwrap();
    }
}
