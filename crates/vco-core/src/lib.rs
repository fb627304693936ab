// vco-core: Audit and provisioning pipelines between vco-api and the CLI.

pub mod audit;
pub mod config;
pub mod error;
pub mod model;
pub mod module;
pub mod orchestrator;
pub mod overlay;
pub mod patch;
pub mod provision;
pub mod report;
pub mod zscaler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use audit::{AuditReport, Auditor, EdgeAudit};
pub use config::{
    AuditMode, AuditPolicy, BurstThresholds, OrchestratorConfig, ProvisionContext,
    ProvisionPolicy, TlsVerification,
};
pub use error::CoreError;
pub use model::{BranchSpec, BwMeasurement, LinkMetric, WanUplink};
pub use orchestrator::Orchestrator;
pub use patch::{DeviceSettingsView, InterfaceRef, PatchBatch, PatchOp, Pointer};
pub use provision::{
    ProvisionOutcome, ProvisionPlan, ProvisionStep, ProvisionedEdge, Provisioner,
};

// API-level types consumers print directly.
pub use vco_api::{ConfigurationModule, EdgeLicense, EnterpriseEdge, LatLon};
