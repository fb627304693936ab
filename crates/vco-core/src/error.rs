// ── Core error types ──
//
// Domain errors from vco-core. Consumers see "module not found" or
// "patch failed", not HTTP status codes. `From<vco_api::Error>` folds
// transport-layer failures into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to orchestrator at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Orchestrator request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Configuration module '{module}' not found for edge {edge_id}")]
    ModuleNotFound { module: String, edge_id: i64 },

    #[error("Interface '{name}' not found in device settings")]
    InterfaceNotFound { name: String },

    #[error("Edge not found: {logical_id}")]
    EdgeNotFound { logical_id: String },

    #[error("Entity not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Patch failed: {message}")]
    Patch { message: String },

    #[error("Geocoding failed: {message}")]
    Geocode { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Could not write report: {message}")]
    Report { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    /// A portal call answered without a `result`; `body` is the full response.
    #[error("Portal call {method} failed:\n{body}")]
    Portal { method: String, body: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn patch(err: impl std::fmt::Display) -> Self {
        Self::Patch {
            message: err.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vco_api::Error> for CoreError {
    fn from(err: vco_api::Error) -> Self {
        match err {
            vco_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            vco_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            vco_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vco_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vco_api::Error::Portal { method, body } => CoreError::Portal { method, body },
            vco_api::Error::Rest { status, message } if status == 401 || status == 403 => {
                CoreError::AuthenticationFailed { message }
            }
            vco_api::Error::Rest { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            vco_api::Error::GeocodeNoResults { address } => CoreError::Geocode {
                message: format!("no results for '{address}'"),
            },
            vco_api::Error::Geocode { status, message } => CoreError::Geocode {
                message: format!("{status}: {message}"),
            },
            vco_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::Report {
            message: err.to_string(),
        }
    }
}
