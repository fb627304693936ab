// Portal enterprise-level methods: edges, licenses, async job status.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::portal::client::PortalClient;
use crate::portal::models::{EdgeLicense, EnterpriseEdge};

impl PortalClient {
    /// List every edge in the token's enterprise.
    ///
    /// `enterprise/getEnterpriseEdges`
    pub async fn get_enterprise_edges(&self) -> Result<Vec<EnterpriseEdge>, Error> {
        debug!("listing enterprise edges");
        self.call_as("enterprise/getEnterpriseEdges", &json!({}))
            .await
    }

    /// Find an edge by its logical id. Returns `None` if no edge matches.
    pub async fn find_edge(&self, logical_id: &str) -> Result<Option<EnterpriseEdge>, Error> {
        let edges = self.get_enterprise_edges().await?;
        Ok(edges.into_iter().find(|e| e.logical_id == logical_id))
    }

    /// List the edge licenses available to the enterprise.
    ///
    /// `license/getEnterpriseEdgeLicenses`
    pub async fn get_enterprise_edge_licenses(&self) -> Result<Vec<EdgeLicense>, Error> {
        debug!("listing edge licenses");
        self.call_as("license/getEnterpriseEdgeLicenses", &json!({}))
            .await
    }

    /// Poll the status of an asynchronous orchestrator job.
    ///
    /// `async/getStatus`. The shape varies by job type, so it stays untyped.
    pub async fn get_async_status(&self, api_token: &str) -> Result<Value, Error> {
        debug!("polling async job status");
        self.call("async/getStatus", &json!({ "apiToken": api_token }))
            .await
    }
}
