// Tag endpoints (scoped to the selected tag manager)

use serde_json::json;
use tracing::debug;

use crate::client::{Service, WirelessTagClient};
use crate::error::Error;
use crate::models::TagEntry;

impl WirelessTagClient {
    /// List the tags of the currently selected tag manager, in the order
    /// the service returns them.
    ///
    /// `POST ethClient.asmx/GetTagList`
    pub async fn get_tag_list(&self) -> Result<Vec<TagEntry>, Error> {
        debug!("listing tags");
        self.call(Service::Client, "GetTagList", &json!({})).await
    }
}
