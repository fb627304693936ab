// ── Runtime configuration ──
//
// These types describe *how* to reach the orchestrator and the policy each
// pipeline runs under. They carry credential data and tuning, but never
// touch disk: `vco-config` builds them and hands them in. Every value is
// read-only after construction and passed explicitly to each operation.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (lab orchestrators with self-signed certs).
    DangerAcceptInvalid,
}

/// Connection context for a single orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Orchestrator origin (e.g. `https://vco.example.net`).
    pub url: Url,
    /// API token, sent as `Authorization: Token {token}`.
    pub token: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl OrchestratorConfig {
    /// Turn a bare hostname (`vco.example.net`) or a full URL into an origin URL.
    pub fn origin_from_host(host: &str) -> Result<Url, url::ParseError> {
        let host = host.trim().trim_end_matches('/');
        if host.contains("://") {
            Url::parse(host)
        } else {
            Url::parse(&format!("https://{host}"))
        }
    }
}

// ── Audit policy ────────────────────────────────────────────────────

/// Whether the auditor writes fixes back to the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditMode {
    /// Report only; nothing is pushed.
    #[default]
    AuditOnly,
    /// Push each corrected `WAN` module.
    Apply,
}

/// Throughput band that marks a link as a burst-mode candidate.
///
/// A link qualifies when `min_downstream < downstream < max_downstream`
/// and `upstream < max_upstream`. All bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstThresholds {
    pub min_downstream_mbps: f64,
    pub max_downstream_mbps: f64,
    pub max_upstream_mbps: f64,
}

impl Default for BurstThresholds {
    fn default() -> Self {
        Self {
            min_downstream_mbps: 175.0,
            max_downstream_mbps: 200.0,
            max_upstream_mbps: 175.0,
        }
    }
}

/// Tuning for the bandwidth audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditPolicy {
    pub thresholds: BurstThresholds,
    /// Trailing metrics window, in minutes.
    pub lookback_mins: u64,
    /// Pause between consecutive per-edge configuration fetches, in milliseconds.
    pub edge_pause_ms: u64,
    pub mode: AuditMode,
    /// Where the affected-links CSV is written.
    pub report_path: PathBuf,
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            thresholds: BurstThresholds::default(),
            lookback_mins: 30,
            edge_pause_ms: 1000,
            mode: AuditMode::AuditOnly,
            report_path: PathBuf::from("affected_links.csv"),
        }
    }
}

impl AuditPolicy {
    pub fn lookback(&self) -> Duration {
        Duration::from_secs(self.lookback_mins.saturating_mul(60))
    }

    pub fn edge_pause(&self) -> Duration {
        Duration::from_millis(self.edge_pause_ms)
    }
}

// ── Provisioning policy ─────────────────────────────────────────────

/// Fixed choices baked into every provisioned branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionPolicy {
    /// Hardware model passed to edge creation.
    pub edge_model: String,
    pub ha_enabled: bool,
    /// LAN-side transit interface; moved to the front of `routedInterfaces`.
    pub transit_interface: String,
    /// Interfaces for the first and second WAN uplink.
    pub uplink_interfaces: [String; 2],
    /// Value written to each touched interface's `l2.probeInterval`.
    pub probe_interval: String,
    pub overlay_mtu: u32,
    pub overlay_vlan_id: u32,
}

impl Default for ProvisionPolicy {
    fn default() -> Self {
        Self {
            edge_model: "edge6X0".into(),
            ha_enabled: true,
            transit_interface: "GE2".into(),
            uplink_interfaces: ["GE3".into(), "GE4".into()],
            probe_interval: "3".into(),
            overlay_mtu: 1500,
            overlay_vlan_id: 2,
        }
    }
}

/// Enterprise identifiers and secrets needed to provision a branch.
#[derive(Debug, Clone)]
pub struct ProvisionContext {
    pub enterprise_logical_id: String,
    pub profile_logical_id: String,
    pub license_logical_id: String,
    pub geocode_api_key: SecretString,
    /// Overrides the public geocoding endpoint.
    pub geocode_endpoint: Option<Url>,
    /// Cloud-security subscription; `None` disables the ZScaler step.
    pub zscaler_subscription_logical_id: Option<String>,
    pub policy: ProvisionPolicy,
}
