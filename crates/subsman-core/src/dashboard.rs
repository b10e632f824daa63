// ── Dashboard actions ──
//
// Every user-triggered operation: call the backend, then write the result
// into the store. Two-step actions stop at the first failure, and a failed
// step never writes to the store.

use std::future::Future;
use std::sync::Arc;

use subsman_api::ApiClient;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{FilteredNodes, GeneratedSubscription, LogPage, SystemSettings};
use crate::settings;
use crate::store::DashboardStore;

/// The entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Owns the backend client and
/// the shared store; clones share both.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    client: ApiClient,
    store: Arc<DashboardStore>,
}

impl Dashboard {
    /// Build a dashboard talking to the backend described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        Ok(Self::with_client(config.build_api_client()?))
    }

    /// Build a dashboard around an existing client (tests, custom transports).
    pub fn with_client(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(DashboardInner {
                client,
                store: Arc::new(DashboardStore::new()),
            }),
        }
    }

    pub fn store(&self) -> &Arc<DashboardStore> {
        &self.inner.store
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    // ── Status ───────────────────────────────────────────────────────

    pub async fn fetch_system_status(&self) -> Result<(), CoreError> {
        logged("fetch_system_status", async {
            let status = self.client().get_status().await?;
            self.store().set_system_status(status);
            Ok(())
        })
        .await
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub async fn fetch_subscriptions(&self) -> Result<(), CoreError> {
        logged("fetch_subscriptions", self.refresh_subscriptions()).await
    }

    /// Import a subscription, then refresh the subscription list.
    pub async fn import_subscription(&self, name: &str, url: &str) -> Result<(), CoreError> {
        logged("import_subscription", async {
            self.client().import_subscription(name, url).await?;
            self.refresh_subscriptions().await
        })
        .await
    }

    /// Merge subscriptions, then refresh the system status (the merged URL
    /// lives there).
    pub async fn merge_subscriptions(&self, ids: &[String]) -> Result<(), CoreError> {
        logged("merge_subscriptions", async {
            self.client().merge_subscriptions(ids).await?;
            let status = self.client().get_status().await?;
            self.store().set_system_status(status);
            Ok(())
        })
        .await
    }

    /// Delete subscriptions, then refresh the subscription list.
    pub async fn delete_subscriptions(&self, ids: &[String]) -> Result<(), CoreError> {
        logged("delete_subscriptions", async {
            self.client().delete_subscriptions(ids).await?;
            self.refresh_subscriptions().await
        })
        .await
    }

    async fn refresh_subscriptions(&self) -> Result<(), CoreError> {
        let subscriptions = self.client().list_subscriptions().await?;
        debug!(count = subscriptions.len(), "subscriptions refreshed");
        self.store().set_subscriptions(subscriptions);
        Ok(())
    }

    // ── Nodes ────────────────────────────────────────────────────────

    pub async fn fetch_nodes(&self) -> Result<(), CoreError> {
        logged("fetch_nodes", self.refresh_nodes()).await
    }

    /// Import nodes from the merged subscription, then refresh the node list.
    pub async fn import_nodes(&self) -> Result<(), CoreError> {
        logged("import_nodes", async {
            self.client().import_nodes().await?;
            self.refresh_nodes().await
        })
        .await
    }

    /// Test every node, then refresh the node list.
    ///
    /// `loading` stays raised for the whole call and drops back on success,
    /// failure, or cancellation.
    pub async fn test_nodes(&self) -> Result<(), CoreError> {
        let _loading = self.store().begin_loading();
        logged("test_nodes", async {
            self.client().test_nodes().await?;
            self.refresh_nodes().await
        })
        .await
    }

    /// Select nodes by thresholds. Does not touch the store.
    pub async fn filter_nodes(
        &self,
        max_delay: u32,
        min_speed: f64,
    ) -> Result<FilteredNodes, CoreError> {
        logged("filter_nodes", async {
            if !(min_speed.is_finite() && min_speed >= 0.0) {
                return Err(CoreError::validation(format!(
                    "min speed must be a finite number >= 0, got {min_speed}"
                )));
            }
            let raw = self.client().filter_nodes(max_delay, min_speed).await?;
            Ok(FilteredNodes::from(raw))
        })
        .await
    }

    /// Generate the final subscription. Does not touch the store.
    pub async fn generate_subscription(&self) -> Result<GeneratedSubscription, CoreError> {
        logged("generate_subscription", async {
            let raw = self.client().generate_subscription().await?;
            Ok(GeneratedSubscription::from(raw))
        })
        .await
    }

    async fn refresh_nodes(&self) -> Result<(), CoreError> {
        let nodes = self.client().list_nodes().await?;
        debug!(count = nodes.len(), "nodes refreshed");
        self.store().set_nodes(nodes);
        Ok(())
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub async fn fetch_settings(&self) -> Result<(), CoreError> {
        logged("fetch_settings", async {
            let settings = self.client().get_settings().await?;
            self.store().set_settings(settings);
            Ok(())
        })
        .await
    }

    /// Validate and send a full settings document. On success the store
    /// holds exactly what was sent.
    pub async fn update_settings(&self, new_settings: SystemSettings) -> Result<(), CoreError> {
        logged("update_settings", async {
            settings::validate(&new_settings)?;
            self.client().update_settings(&new_settings).await?;
            self.store().set_settings(new_settings);
            Ok(())
        })
        .await
    }

    // ── Logs ─────────────────────────────────────────────────────────

    /// Fetch one page of logs into the store and return it with the total.
    pub async fn fetch_logs(&self, page: u32, page_size: u32) -> Result<LogPage, CoreError> {
        logged("fetch_logs", async {
            let page = LogPage::from(self.client().get_logs(page, page_size).await?);
            self.store().set_logs(page.logs.clone());
            Ok(page)
        })
        .await
    }

    pub async fn clear_logs(&self) -> Result<(), CoreError> {
        logged("clear_logs", async {
            self.client().clear_logs().await?;
            self.store().clear_logs();
            Ok(())
        })
        .await
    }
}

/// Run an action, logging its failure before handing it back.
async fn logged<T>(
    action: &'static str,
    fut: impl Future<Output = Result<T, CoreError>>,
) -> Result<T, CoreError> {
    fut.await
        .inspect_err(|e| warn!(action, error = %e, "dashboard action failed"))
}
