// Status endpoint
//
// Aggregate node counts, the currently served subscription URLs, and the
// generation history.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::SystemStatus;

impl ApiClient {
    /// Fetch the system status snapshot.
    ///
    /// `GET /api/status`
    pub async fn get_status(&self) -> Result<SystemStatus, Error> {
        let url = self.api_url("status")?;
        debug!("fetching system status");
        self.get(url).await?.ok_or_else(|| Error::MissingData {
            endpoint: "status".into(),
        })
    }
}
