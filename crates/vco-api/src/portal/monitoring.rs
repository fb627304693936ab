// Portal monitoring methods

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::portal::client::PortalClient;
use crate::portal::models::{Interval, LinkMetricEntry};

/// Best-path receive counter, bits per second.
pub const METRIC_BEST_PATH_RX: &str = "bpsOfBestPathRx";
/// Best-path transmit counter, bits per second.
pub const METRIC_BEST_PATH_TX: &str = "bpsOfBestPathTx";

impl PortalClient {
    /// Aggregate link metrics across every edge in the enterprise.
    ///
    /// `monitoring/getAggregateEdgeLinkMetrics`
    pub async fn get_aggregate_edge_link_metrics(
        &self,
        metrics: &[&str],
        interval: Interval,
    ) -> Result<Vec<LinkMetricEntry>, Error> {
        debug!(?metrics, start = interval.start, "fetching aggregate link metrics");
        self.call_as(
            "monitoring/getAggregateEdgeLinkMetrics",
            &json!({
                "metrics": metrics,
                "interval": interval,
            }),
        )
        .await
    }
}
