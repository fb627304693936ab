// ── WAN link throughput ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use vco_api::LinkMetricEntry;

const BPS_PER_MBPS: f64 = 1_000_000.0;

/// Convert bits per second to megabits per second (decimal).
pub fn bps_to_mbps(bps: f64) -> f64 {
    bps / BPS_PER_MBPS
}

/// How the orchestrator sizes a WAN link's bandwidth.
///
/// Stored in the `WAN` module as `links[].bwMeasurement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BwMeasurement {
    /// Measured by a burst test at link-up. Under-reports on burst-mode circuits.
    SlowStart,
    /// Fixed at the last measured value.
    Static,
    /// Operator-supplied upstream/downstream figures.
    UserDefined,
}

/// One WAN link with its trailing-window throughput, in Mbps.
///
/// Field order is the column order of the affected-links report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkMetric {
    pub edge_id: i64,
    pub edge_name: String,
    pub link_internal_id: String,
    pub link_name: String,
    pub isp: String,
    pub upstream_mbps: f64,
    pub downstream_mbps: f64,
}

impl From<LinkMetricEntry> for LinkMetric {
    /// Upstream is what the edge transmits, downstream what it receives.
    fn from(entry: LinkMetricEntry) -> Self {
        Self {
            edge_id: entry.link.edge_id,
            edge_name: entry.link.edge_name,
            link_internal_id: entry.link.internal_id,
            link_name: entry.link.display_name,
            isp: entry.link.isp.unwrap_or_default(),
            upstream_mbps: bps_to_mbps(entry.bps_of_best_path_tx),
            downstream_mbps: bps_to_mbps(entry.bps_of_best_path_rx),
        }
    }
}
