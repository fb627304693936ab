// ── Domain model ──
//
// Typed views over the pieces of orchestrator data the pipelines reason
// about: per-link throughput samples and the branch description that
// drives provisioning.

pub mod branch;
pub mod link;

pub use branch::{BranchSpec, WanUplink, nth_host};
pub use link::{BwMeasurement, LinkMetric, bps_to_mbps};
