// Operation log endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LogQuery, LogsResponse};

impl ApiClient {
    /// Fetch one page of operation logs.
    ///
    /// `GET /api/logs?page={page}&pageSize={page_size}`
    pub async fn get_logs(&self, page: u32, page_size: u32) -> Result<LogsResponse, Error> {
        let url = self.api_url("logs")?;
        debug!(page, page_size, "fetching logs");
        let query = LogQuery { page, page_size };
        Ok(self.get_with_query(url, &query).await?.unwrap_or_default())
    }

    /// Remove every operation log.
    ///
    /// `DELETE /api/logs`
    pub async fn clear_logs(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("logs")?;
        debug!("clearing logs");
        Ok(self.delete(url).await?.unwrap_or_default())
    }
}
