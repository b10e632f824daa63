// Node endpoints
//
// Node import and testing are long-running on the backend; the request
// blocks until the backend finishes (bounded by the transport timeout).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{FilterNodesRequest, FilterNodesResponse, GenerateSubscriptionResponse, Node};

impl ApiClient {
    /// Pull nodes out of the merged subscription.
    ///
    /// `POST /api/node/import`
    pub async fn import_nodes(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("node/import")?;
        debug!("importing nodes");
        Ok(self.post_empty(url).await?.unwrap_or_default())
    }

    /// Run a delay/speed test across all nodes.
    ///
    /// `POST /api/node/test`
    pub async fn test_nodes(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("node/test")?;
        debug!("testing nodes");
        Ok(self.post_empty(url).await?.unwrap_or_default())
    }

    /// List all known nodes with their latest measurements.
    ///
    /// `GET /api/node/list`
    pub async fn list_nodes(&self) -> Result<Vec<Node>, Error> {
        let url = self.api_url("node/list")?;
        debug!("listing nodes");
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// Select nodes under `max_delay` ms and at or above `min_speed` MB/s.
    ///
    /// `POST /api/node/filter` with `{"maxDelay", "minSpeed"}`
    pub async fn filter_nodes(
        &self,
        max_delay: u32,
        min_speed: f64,
    ) -> Result<FilterNodesResponse, Error> {
        let url = self.api_url("node/filter")?;
        debug!(max_delay, min_speed, "filtering nodes");
        let body = FilterNodesRequest {
            max_delay,
            min_speed,
        };
        Ok(self.post(url, &body).await?.unwrap_or_default())
    }

    /// Generate the final subscription from the last filter result.
    ///
    /// `POST /api/node/generate-subscription`
    pub async fn generate_subscription(&self) -> Result<GenerateSubscriptionResponse, Error> {
        let url = self.api_url("node/generate-subscription")?;
        debug!("generating subscription");
        self.post_empty(url)
            .await?
            .ok_or_else(|| Error::MissingData {
                endpoint: "node/generate-subscription".into(),
            })
    }
}
