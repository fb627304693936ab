//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use vco_config::ConfigError;
use vco_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARTIAL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to orchestrator at {url}")]
    #[diagnostic(
        code(vcoctl::connection_failed),
        help(
            "Check that VCO names a reachable orchestrator.\n\
             {reason}\n\
             For self-signed certificates try: vcoctl --insecure ..."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(vcoctl::timeout),
        help("Increase the timeout with --timeout or `timeout` in vcoctl.toml.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(vcoctl::auth_failed),
        help("Verify VCO_TOKEN. Tokens are issued per user from the orchestrator UI.")
    )]
    AuthFailed { message: String },

    // ── Environment & configuration ──────────────────────────────────

    #[error("Required environment variable {name} is not set")]
    #[diagnostic(
        code(vcoctl::missing_variable),
        help(
            "Add {name}=... to .env in the working directory, pass --env-file,\n\
             or export it in the shell."
        )
    )]
    MissingVariable { name: String },

    #[error("Could not load configuration: {message}")]
    #[diagnostic(
        code(vcoctl::config),
        help("Policy files are read from {path} and ./vcoctl.toml.")
    )]
    Config { message: String, path: String },

    #[error("Cannot parse {path}: {message}")]
    #[diagnostic(code(vcoctl::parse))]
    Parse { path: String, message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(vcoctl::not_found),
        help("Run: vcoctl {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Module '{module}' not found in the device scope of edge {edge_id}")]
    #[diagnostic(
        code(vcoctl::module_not_found),
        help(
            "The orchestrator has not populated this module yet; \
             try again once the edge is created."
        )
    )]
    ModuleNotFound { module: String, edge_id: i64 },

    #[error("Interface '{name}' not found in deviceSettings")]
    #[diagnostic(
        code(vcoctl::interface_not_found),
        help(
            "Check provision.transit_interface and provision.uplink_interfaces\n\
             against the edge model. Inspect with: vcoctl modules dump --edge-id N"
        )
    )]
    InterfaceNotFound { name: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(vcoctl::api_error))]
    ApiError { message: String, status: Option<u16> },

    #[error("Portal call {method} failed:\n{body}")]
    #[diagnostic(code(vcoctl::portal_error))]
    Portal { method: String, body: String },

    #[error("Geocoding failed: {message}")]
    #[diagnostic(
        code(vcoctl::geocode),
        help("Check postal_code and country in the branch file, and GOOGLE_MAPS_API_KEY.")
    )]
    Geocode { message: String },

    #[error("Patch failed: {message}")]
    #[diagnostic(
        code(vcoctl::patch),
        help(
            "The deviceSettings document has an unexpected shape.\n\
             Preview with: vcoctl provision --plan"
        )
    )]
    Patch { message: String },

    // ── Provisioning ─────────────────────────────────────────────────

    #[error("Edge '{name}' was created but provisioning stopped at {failed_step}")]
    #[diagnostic(
        code(vcoctl::partially_provisioned),
        help(
            "Edge {logical_id} exists at {url}\n\
             Completed steps: {completed}\n\
             Finish its configuration manually or delete the edge before retrying."
        )
    )]
    PartiallyProvisioned {
        name: String,
        logical_id: String,
        url: String,
        failed_step: String,
        completed: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vcoctl::validation))]
    Validation { field: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("'{action}' needs confirmation but stdin is not a terminal")]
    #[diagnostic(
        code(vcoctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Output ───────────────────────────────────────────────────────

    #[error("Could not write report: {message}")]
    #[diagnostic(code(vcoctl::report))]
    Report { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(vcoctl::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(vcoctl::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(vcoctl::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. }
            | Self::ModuleNotFound { .. }
            | Self::InterfaceNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::PartiallyProvisioned { .. } => exit_code::PARTIAL,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::ModuleNotFound { module, edge_id } => {
                CliError::ModuleNotFound { module, edge_id }
            }

            CoreError::InterfaceNotFound { name } => CliError::InterfaceNotFound { name },

            CoreError::EdgeNotFound { logical_id } => CliError::NotFound {
                resource_type: "edge".into(),
                identifier: logical_id,
                list_command: "edges list".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
                list_command: "modules dump --edge-id N".into(),
            },

            CoreError::Patch { message } => CliError::Patch { message },

            CoreError::Geocode { message } => CliError::Geocode { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "branch".into(),
                reason: message,
            },

            CoreError::Report { message } => CliError::Report { message },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Portal { method, body } => CliError::Portal { method, body },

            CoreError::Config { message } => CliError::Config {
                message,
                path: vco_config::config_path().display().to_string(),
            },

            CoreError::Io(e) => CliError::Io(e),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingVariable { name } => CliError::MissingVariable { name },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::Config {
                message: e.to_string(),
                path: vco_config::config_path().display().to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Parse { path, message } => CliError::Parse {
                path: path.display().to_string(),
                message,
            },
        }
    }
}
