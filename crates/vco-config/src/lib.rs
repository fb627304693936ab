//! Configuration loading for vcoctl.
//!
//! Three sources feed a run: the `.env` file and process environment
//! (orchestrator host, token and enterprise identifiers), an optional TOML
//! policy file (thresholds, timeouts, interface choices), and a branch
//! specification file for provisioning. Everything is translated into the
//! immutable `vco_core` config types before any pipeline starts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use vco_core::{
    AuditPolicy, BranchSpec, OrchestratorConfig, ProvisionContext, ProvisionPolicy,
    TlsVerification,
};

// ── Environment variable names ──────────────────────────────────────

/// Orchestrator hostname (or URL).
pub const ENV_HOST: &str = "VCO";
pub const ENV_TOKEN: &str = "VCO_TOKEN";
pub const ENV_ENTERPRISE: &str = "ENT_LOG_ID";
pub const ENV_PROFILE: &str = "BRANCH_PROF_LOG_ID";
pub const ENV_LICENSE: &str = "BRANCH_LIC_LOG_ID";
pub const ENV_GEOCODE_KEY: &str = "GOOGLE_MAPS_API_KEY";
/// Optional cloud-security subscription.
pub const ENV_ZSCALER: &str = "ZSCALER_SUB_LOG_ID";

/// Prefix for policy overrides from the environment, e.g. `VCOCTL_AUDIT__MODE=apply`.
pub const SETTINGS_ENV_PREFIX: &str = "VCOCTL_";

const SETTINGS_FILE: &str = "vcoctl.toml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {name}")]
    MissingVariable { name: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Policy file ─────────────────────────────────────────────────────

/// Contents of `vcoctl.toml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Skip TLS verification.
    pub insecure: bool,
    /// Extra CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
    /// Geocoding endpoint override.
    pub geocode_url: Option<Url>,
    pub audit: AuditPolicy,
    pub provision: ProvisionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: 30,
            insecure: false,
            ca_cert: None,
            geocode_url: None,
            audit: AuditPolicy::default(),
            provision: ProvisionPolicy::default(),
        }
    }
}

impl Settings {
    pub fn tls(&self) -> TlsVerification {
        if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }
}

/// User-level policy file location via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "vcoctl", "vcoctl").map_or_else(
        || PathBuf::from(".config").join("vcoctl").join(SETTINGS_FILE),
        |dirs| dirs.config_dir().join(SETTINGS_FILE),
    )
}

/// Load policy settings.
///
/// Defaults, then the user-level file and `./vcoctl.toml` (or only
/// `explicit` when given), then `VCOCTL_`-prefixed environment variables
/// with `__` separating nested keys.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file {} not found", path.display()),
            )));
        }
        figment = figment.merge(Toml::file(path));
    } else {
        figment = figment
            .merge(Toml::file(config_path()))
            .merge(Toml::file(SETTINGS_FILE));
    }

    let settings: Settings = figment
        .merge(Env::prefixed(SETTINGS_ENV_PREFIX).split("__"))
        .extract()?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    let t = &settings.audit.thresholds;
    if t.min_downstream_mbps >= t.max_downstream_mbps {
        return Err(ConfigError::Validation {
            field: "audit.thresholds".into(),
            reason: format!(
                "min_downstream_mbps ({}) must be below max_downstream_mbps ({})",
                t.min_downstream_mbps, t.max_downstream_mbps
            ),
        });
    }
    if settings.provision.transit_interface.is_empty()
        || settings.provision.uplink_interfaces.iter().any(String::is_empty)
    {
        return Err(ConfigError::Validation {
            field: "provision".into(),
            reason: "interface names must not be empty".into(),
        });
    }
    Ok(())
}

// ── Environment ─────────────────────────────────────────────────────

/// Load `.env` into the process environment.
///
/// With no explicit path, a missing `./.env` is not an error. Variables
/// already set in the environment win over the file.
pub fn load_dotenv(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    let result = match explicit {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match result {
        Ok(path) => Ok(Some(path)),
        Err(err) if explicit.is_none() && err.not_found() => Ok(None),
        Err(err) => Err(ConfigError::Parse {
            path: explicit.map_or_else(|| PathBuf::from(".env"), Path::to_path_buf),
            message: err.to_string(),
        }),
    }
}

/// Read a variable from the process environment; empty counts as unset.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn require(env: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    env(name).ok_or_else(|| ConfigError::MissingVariable { name: name.into() })
}

/// Orchestrator connection from `VCO` / `VCO_TOKEN` plus policy settings.
pub fn orchestrator_config(
    settings: &Settings,
    env: impl Fn(&str) -> Option<String>,
) -> Result<OrchestratorConfig, ConfigError> {
    let host = require(&env, ENV_HOST)?;
    let token = require(&env, ENV_TOKEN)?;
    let url = OrchestratorConfig::origin_from_host(&host).map_err(|e| ConfigError::Validation {
        field: ENV_HOST.into(),
        reason: format!("'{host}' is not a valid host: {e}"),
    })?;

    Ok(OrchestratorConfig {
        url,
        token: SecretString::from(token),
        tls: settings.tls(),
        timeout: Duration::from_secs(settings.timeout),
    })
}

/// Enterprise identifiers and geocoding key for provisioning.
pub fn provision_context(
    settings: &Settings,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ProvisionContext, ConfigError> {
    Ok(ProvisionContext {
        enterprise_logical_id: require(&env, ENV_ENTERPRISE)?,
        profile_logical_id: require(&env, ENV_PROFILE)?,
        license_logical_id: require(&env, ENV_LICENSE)?,
        geocode_api_key: SecretString::from(require(&env, ENV_GEOCODE_KEY)?),
        geocode_endpoint: settings.geocode_url.clone(),
        zscaler_subscription_logical_id: env(ENV_ZSCALER),
        policy: settings.provision.clone(),
    })
}

// ── Branch specification files ──────────────────────────────────────

/// Parse and validate a branch file. Format follows the extension:
/// `.toml`, `.yaml`/`.yml` or `.json`.
pub fn load_branch(path: &Path) -> Result<BranchSpec, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let branch: BranchSpec = match ext.as_deref() {
        Some("toml") => toml::from_str(&text).map_err(|e| parse_err(e.to_string()))?,
        Some("yaml" | "yml") => serde_yaml::from_str(&text).map_err(|e| parse_err(e.to_string()))?,
        Some("json") => serde_json::from_str(&text).map_err(|e| parse_err(e.to_string()))?,
        _ => {
            return Err(parse_err(
                "unsupported extension (expected .toml, .yaml, .yml or .json)".into(),
            ));
        }
    };

    branch.validate().map_err(|e| ConfigError::Validation {
        field: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(branch)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;
    use vco_core::AuditMode;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const BRANCH_TOML: &str = r#"
name = "test edge 777"
country = "US"
postal_code = "62269"
contact_name = "Pat Doe"
contact_email = "pat@example.com"
transit_net = "10.0.0.0/30"
corporate_nets = ["172.16.10.0/24"]
byod_net = "192.168.200.0/24"
guest_net = "192.168.201.0/24"

[[wans]]
name = "ISP-A"
network = "172.16.0.0/30"
local = "172.16.0.2"
gateway = "172.16.0.1"
upstream_mbps = 50
downstream_mbps = 50

[[wans]]
name = "ISP-B"
network = "172.16.0.4/30"
local = "172.16.0.6"
gateway = "172.16.0.5"
upstream_mbps = 50
downstream_mbps = 50
standby = true
"#;

    #[test]
    fn missing_variable_is_named() {
        let err = orchestrator_config(&Settings::default(), env_of(&[("VCO", "vco.example.net")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable { ref name } if name == "VCO_TOKEN"));
    }

    #[test]
    fn orchestrator_config_from_env() {
        let settings = Settings {
            insecure: true,
            timeout: 5,
            ..Settings::default()
        };
        let cfg = orchestrator_config(
            &settings,
            env_of(&[("VCO", "vco.example.net"), ("VCO_TOKEN", "abc")]),
        )
        .unwrap();
        assert_eq!(cfg.url.as_str(), "https://vco.example.net/");
        assert_eq!(cfg.token.expose_secret(), "abc");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn provision_context_requires_each_id() {
        let env = env_of(&[
            ("ENT_LOG_ID", "ent"),
            ("BRANCH_PROF_LOG_ID", "prof"),
            ("GOOGLE_MAPS_API_KEY", "key"),
        ]);
        let err = provision_context(&Settings::default(), env).unwrap_err();
        assert!(err.to_string().contains("BRANCH_LIC_LOG_ID"));
    }

    #[test]
    fn zscaler_subscription_is_optional() {
        let env = env_of(&[
            ("ENT_LOG_ID", "ent"),
            ("BRANCH_PROF_LOG_ID", "prof"),
            ("BRANCH_LIC_LOG_ID", "lic"),
            ("GOOGLE_MAPS_API_KEY", "key"),
        ]);
        let ctx = provision_context(&Settings::default(), env).unwrap();
        assert!(ctx.zscaler_subscription_logical_id.is_none());
        assert_eq!(ctx.policy.edge_model, "edge6X0");
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(
            &path,
            "timeout = 10\n[audit]\nmode = \"apply\"\nedge_pause_ms = 250\n[audit.thresholds]\nmax_upstream_mbps = 100.0\n",
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.timeout, 10);
        assert_eq!(settings.audit.mode, AuditMode::Apply);
        assert_eq!(settings.audit.edge_pause_ms, 250);
        assert!((settings.audit.thresholds.max_upstream_mbps - 100.0).abs() < f64::EPSILON);
        assert!((settings.audit.thresholds.min_downstream_mbps - 175.0).abs() < f64::EPSILON);
        assert_eq!(settings.audit.lookback_mins, 30);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(&path, "[audit.thresholds]\nmin_downstream_mbps = 250.0\n").unwrap();
        assert!(matches!(
            load_settings(Some(&path)),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn explicit_missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_settings(Some(&dir.path().join("nope.toml"))),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn branch_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branch.toml");
        std::fs::write(&path, BRANCH_TOML).unwrap();

        let branch = load_branch(&path).unwrap();
        assert_eq!(branch.name, "test edge 777");
        assert_eq!(branch.wans[1].gateway.to_string(), "172.16.0.5");
        assert!(branch.wans[1].standby);
        assert!(!branch.wans[0].standby);
    }

    #[test]
    fn branch_from_yaml_matches_toml() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("branch.toml");
        std::fs::write(&toml_path, BRANCH_TOML).unwrap();
        let from_toml = load_branch(&toml_path).unwrap();

        let yaml_path = dir.path().join("branch.yml");
        std::fs::write(&yaml_path, serde_yaml::to_string(&from_toml).unwrap()).unwrap();
        assert_eq!(load_branch(&yaml_path).unwrap(), from_toml);
    }

    #[test]
    fn invalid_branch_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branch.json");
        let mut branch: serde_json::Value =
            serde_json::to_value(toml::from_str::<BranchSpec>(BRANCH_TOML).unwrap()).unwrap();
        branch["wans"][0]["gateway"] = "10.9.9.9".into();
        std::fs::write(&path, branch.to_string()).unwrap();

        let err = load_branch(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert!(err.to_string().contains("wans[0].gateway"), "{err}");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branch.ini");
        std::fs::write(&path, "name=x").unwrap();
        assert!(matches!(load_branch(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn explicit_env_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dotenv(Some(&dir.path().join("missing.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
