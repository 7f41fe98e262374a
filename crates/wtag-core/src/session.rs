// ── Remote session seam ──
//
// The cloud keeps "which tag manager is selected" in the session, so
// listing a manager's tags is two calls that must not interleave with
// another manager's. `TagSession::fetch_tag_list` is the one operation
// adapters see; `CloudSession` holds its client lock across both steps.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;

use wtag_api::{TransportConfig, WirelessTagClient};

use crate::config::{AuthCredentials, ServerConfig};
use crate::error::CoreError;
use crate::model::{MacAddress, TagManager, TagRecord};

/// Remote operations a tag manager node and the controller depend on.
pub trait TagSession: Send + Sync {
    /// List the account's tag managers.
    fn list_managers(&self) -> impl Future<Output = Result<Vec<TagManager>, CoreError>> + Send;

    /// Select `mac` on the session and list its tags, as one operation.
    ///
    /// Fails with [`CoreError::SelectionFailed`] when the manager can't be
    /// selected and [`CoreError::TagListFailed`] when listing fails.
    fn fetch_tag_list(
        &self,
        mac: &MacAddress,
    ) -> impl Future<Output = Result<Vec<TagRecord>, CoreError>> + Send;
}

/// `TagSession` backed by the Wireless Sensor Tags cloud.
pub struct CloudSession {
    client: Mutex<WirelessTagClient>,
    timeout: Duration,
}

impl CloudSession {
    /// Wrap an already-authenticated client built with `timeout`.
    pub fn new(client: WirelessTagClient, timeout: Duration) -> Self {
        Self {
            client: Mutex::new(client),
            timeout,
        }
    }

    /// Build a client from `config` and authenticate it.
    pub async fn connect(config: &ServerConfig) -> Result<Self, CoreError> {
        let api_err = |e: wtag_api::Error| CoreError::from_api(e, config.timeout);
        let transport = TransportConfig {
            timeout: config.timeout,
            cookie_jar: None,
        };
        let client = WirelessTagClient::new(config.api_url.clone(), &transport).map_err(api_err)?;

        let client = match &config.auth {
            AuthCredentials::Token(token) => {
                debug!("using bearer token -- skipping sign-in");
                client.with_token(token.clone())
            }
            AuthCredentials::Credentials { email, password } => {
                client.sign_in(email, password).await.map_err(api_err)?;
                debug!("session sign-in successful");
                client
            }
        };

        Ok(Self::new(client, config.timeout))
    }

    fn api_err(&self, err: wtag_api::Error) -> CoreError {
        CoreError::from_api(err, self.timeout)
    }

    /// Failure reason for a select or list step, with timeouts spelled out.
    fn reason(&self, err: wtag_api::Error) -> String {
        self.api_err(err).to_string()
    }
}

impl TagSession for CloudSession {
    async fn list_managers(&self) -> Result<Vec<TagManager>, CoreError> {
        let client = self.client.lock().await;
        let entries = client
            .get_tag_managers()
            .await
            .map_err(|e| self.api_err(e))?;
        Ok(entries.into_iter().map(TagManager::from).collect())
    }

    async fn fetch_tag_list(&self, mac: &MacAddress) -> Result<Vec<TagRecord>, CoreError> {
        let client = self.client.lock().await;

        client
            .select_tag_manager(mac.as_str())
            .await
            .map_err(|e| CoreError::SelectionFailed {
                mac: mac.to_string(),
                reason: self.reason(e),
            })?;

        let entries = client
            .get_tag_list()
            .await
            .map_err(|e| CoreError::TagListFailed {
                mac: mac.to_string(),
                reason: self.reason(e),
            })?;

        Ok(entries.into_iter().map(TagRecord::from).collect())
    }
}
