// Portal API response types
//
// Models for the orchestrator's JSON-RPC "portal" surface. The portal is
// loose about field presence across releases, so everything beyond the
// identifying fields is optional and unknown fields land in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Configuration stack ──────────────────────────────────────────────

/// One scope of an edge's configuration stack (device, profile, ...).
///
/// `edge/getEdgeConfigurationStack` returns these most-specific first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub modules: Vec<ConfigurationModule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named, independently updatable configuration module (`WAN`,
/// `deviceSettings`, ...).
///
/// `data` is a vendor-defined document that callers edit as a JSON tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationModule {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refs: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of the `_update` member of `configuration/updateConfigurationModule`.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleUpdate<'a> {
    pub data: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<&'a Value>,
}

// ── Enterprise ───────────────────────────────────────────────────────

/// Edge as listed by `enterprise/getEnterpriseEdges`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseEdge {
    pub id: i64,
    pub logical_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub edge_state: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Edge license from `license/getEnterpriseEdgeLicenses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLicense {
    pub id: i64,
    pub logical_id: String,
    pub name: String,
    #[serde(default)]
    pub bandwidth_tier: String,
    #[serde(default)]
    pub edition: String,
    #[serde(default)]
    pub term_months: i64,
}

// ── Monitoring ───────────────────────────────────────────────────────

/// One row of `monitoring/getAggregateEdgeLinkMetrics`.
///
/// Only the best-path throughput counters are modeled; the portal returns
/// whichever metrics were requested as top-level siblings of `link`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMetricEntry {
    pub link: LinkInfo,
    #[serde(default)]
    pub bps_of_best_path_rx: f64,
    #[serde(default)]
    pub bps_of_best_path_tx: f64,
}

/// Link identity nested in a metrics row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
    pub edge_id: i64,
    #[serde(default)]
    pub edge_name: String,
    pub internal_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub isp: Option<String>,
}

/// Time window for monitoring queries, in epoch milliseconds.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Interval {
    pub start: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}
