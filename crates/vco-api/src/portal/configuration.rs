// Portal configuration methods
//
// Configuration stacks are read per edge and written back one module at a
// time. There is no partial update: the whole module document is replaced.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::portal::client::PortalClient;
use crate::portal::models::{ConfigurationProfile, ModuleUpdate};

impl PortalClient {
    /// Fetch an edge's configuration stack, most specific scope first.
    ///
    /// `edge/getEdgeConfigurationStack`
    pub async fn get_edge_configuration_stack(
        &self,
        edge_id: i64,
    ) -> Result<Vec<ConfigurationProfile>, Error> {
        debug!(edge_id, "fetching configuration stack");
        self.call_as(
            "edge/getEdgeConfigurationStack",
            &json!({ "edgeId": edge_id }),
        )
        .await
    }

    /// Replace a configuration module's `data` (and optionally `refs`).
    ///
    /// `configuration/updateConfigurationModule`
    pub async fn update_configuration_module(
        &self,
        module_id: i64,
        data: &Value,
        refs: Option<&Value>,
    ) -> Result<Value, Error> {
        debug!(module_id, with_refs = refs.is_some(), "updating configuration module");
        self.call(
            "configuration/updateConfigurationModule",
            &json!({
                "id": module_id,
                "_update": ModuleUpdate { data, refs },
            }),
        )
        .await
    }
}
