// Settings endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::SystemSettings;

impl ApiClient {
    /// Fetch the settings singleton.
    ///
    /// `GET /api/settings`
    pub async fn get_settings(&self) -> Result<SystemSettings, Error> {
        let url = self.api_url("settings")?;
        debug!("fetching settings");
        self.get(url).await?.ok_or_else(|| Error::MissingData {
            endpoint: "settings".into(),
        })
    }

    /// Replace the settings singleton.
    ///
    /// `POST /api/settings` with the full `SystemSettings` body
    pub async fn update_settings(
        &self,
        settings: &SystemSettings,
    ) -> Result<serde_json::Value, Error> {
        let url = self.api_url("settings")?;
        debug!("updating settings");
        Ok(self.post(url, settings).await?.unwrap_or_default())
    }
}
