use thiserror::Error;

/// Top-level error type for the `vco-api` crate.
///
/// Covers every failure mode across the three HTTP surfaces this crate talks
/// to: the portal JSON-RPC endpoint, the REST v2 API, and the geocoding
/// lookup. `vco-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token rejected by the orchestrator, or not usable as a header value.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Portal (JSON-RPC) ───────────────────────────────────────────
    /// The portal response carried no `result` member.
    ///
    /// The server's JSON-RPC error object is not interpreted; the whole
    /// response is kept as pretty-printed text for diagnostics.
    #[error("Portal call {method} returned no result:\n{body}")]
    Portal { method: String, body: String },

    // ── REST v2 ─────────────────────────────────────────────────────
    /// Non-success status from the REST API.
    #[error("REST API error (HTTP {status}): {message}")]
    Rest { status: u16, message: String },

    // ── Geocoding ───────────────────────────────────────────────────
    /// The geocoder answered but found nothing for the address.
    #[error("No geocoding results for '{address}'")]
    GeocodeNoResults { address: String },

    /// The geocoder refused the request (bad key, quota, etc.)
    #[error("Geocoding failed ({status}): {message}")]
    Geocode { status: String, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the orchestrator rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Rest { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Rest { status: 404, .. } | Self::GeocodeNoResults { .. } => true,
            _ => false,
        }
    }

    /// Build a `Deserialization` error with a short body preview in the message.
    pub(crate) fn deserialization(err: &serde_json::Error, body: String) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body,
        }
    }
}
