// vco-api: Async Rust client for the SD-WAN orchestrator APIs (portal + REST v2)

pub mod auth;
pub mod error;
pub mod geocode;
pub mod portal;
pub mod sdwan;
pub mod transport;

pub use error::Error;
pub use geocode::{GeocodeClient, LatLon};
pub use portal::PortalClient;
pub use portal::models::{
    ConfigurationModule, ConfigurationProfile, EdgeLicense, EnterpriseEdge, Interval, LinkInfo,
    LinkMetricEntry,
};
pub use sdwan::SdwanClient;
pub use sdwan::models::{CreateEdgeRequest, CreatedEdge, EdgeSite, RestEdge};
pub use transport::{TlsMode, TransportConfig};
