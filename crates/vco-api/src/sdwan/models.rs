// REST v2 request/response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Site details attached to a new edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSite {
    pub lat: f64,
    pub lon: f64,
    pub contact_name: String,
    pub contact_email: String,
}

/// Body of `POST /enterprises/{enterprise}/edges`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEdgeRequest {
    pub model_number: String,
    /// Logical id of the configuration profile to assign.
    pub profile: String,
    pub name: String,
    /// Logical id of the edge license to assign.
    pub license: String,
    pub ha_enabled: bool,
    pub site: EdgeSite,
}

/// Response to an edge creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEdge {
    pub logical_id: String,
    /// Server-relative link to the new edge resource.
    #[serde(rename = "_href", default)]
    pub href: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Edge resource as listed by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestEdge {
    pub logical_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub edge_state: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a REST v2 collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "_metadata", default)]
    pub metadata: PageMetadata,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub more: bool,
    #[serde(default)]
    pub next_page_link: Option<String>,
}
