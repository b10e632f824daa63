// Subscription endpoints
//
// Import, list, merge, and delete remote subscriptions. Command endpoints
// return whatever `data` the backend chose to send (often nothing).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{IdsRequest, ImportSubscriptionRequest, Subscription};

impl ApiClient {
    /// Import a remote subscription by URL.
    ///
    /// `POST /api/subscription/import` with `{"name", "url"}`
    pub async fn import_subscription(
        &self,
        name: &str,
        url: &str,
    ) -> Result<serde_json::Value, Error> {
        let endpoint = self.api_url("subscription/import")?;
        debug!(name, url, "importing subscription");
        let data = self
            .post(endpoint, &ImportSubscriptionRequest { name, url })
            .await?;
        Ok(data.unwrap_or_default())
    }

    /// List all imported subscriptions.
    ///
    /// `GET /api/subscription/list`
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>, Error> {
        let url = self.api_url("subscription/list")?;
        debug!("listing subscriptions");
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// Merge the given subscriptions into the served merged subscription.
    ///
    /// `POST /api/subscription/merge` with `{"ids": [...]}`
    pub async fn merge_subscriptions(&self, ids: &[String]) -> Result<serde_json::Value, Error> {
        let url = self.api_url("subscription/merge")?;
        debug!(count = ids.len(), "merging subscriptions");
        let data = self.post(url, &IdsRequest { ids }).await?;
        Ok(data.unwrap_or_default())
    }

    /// Delete subscriptions by id.
    ///
    /// `DELETE /api/subscription/delete` with `{"ids": [...]}`
    pub async fn delete_subscriptions(&self, ids: &[String]) -> Result<serde_json::Value, Error> {
        let url = self.api_url("subscription/delete")?;
        debug!(count = ids.len(), "deleting subscriptions");
        let data = self.delete_with_body(url, &IdsRequest { ids }).await?;
        Ok(data.unwrap_or_default())
    }
}
