// Portal API client modules
//
// Hand-written client for the orchestrator's JSON-RPC "portal" endpoint.
// Each file adds the inherent methods for one method family.

pub mod client;
pub mod configuration;
pub mod enterprise;
pub mod models;
pub mod monitoring;

pub use client::PortalClient;
