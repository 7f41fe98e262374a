// Tag manager endpoints
//
// Listing is account-scoped. Selection switches the session's active
// manager, which every `ethClient.asmx` call then operates on.

use serde::de::IgnoredAny;
use serde_json::json;
use tracing::debug;

use crate::client::{Service, WirelessTagClient};
use crate::error::Error;
use crate::models::TagManagerEntry;

impl WirelessTagClient {
    /// List all tag managers registered to the account.
    ///
    /// `POST ethAccount.asmx/GetTagManagers`
    pub async fn get_tag_managers(&self) -> Result<Vec<TagManagerEntry>, Error> {
        debug!("listing tag managers");
        self.call(Service::Account, "GetTagManagers", &json!({}))
            .await
    }

    /// Make `mac` the active tag manager for this session.
    ///
    /// `POST ethAccount.asmx/SelectTagManager`
    pub async fn select_tag_manager(&self, mac: &str) -> Result<(), Error> {
        debug!(mac, "selecting tag manager");
        self.call::<IgnoredAny>(Service::Account, "SelectTagManager", &json!({ "mac": mac }))
            .await?;
        Ok(())
    }
}
