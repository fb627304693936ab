// Portal JSON-RPC client
//
// Wraps `reqwest::Client` with the orchestrator's JSON-RPC 2.0 envelope.
// Every portal method is a POST to `/portal/`; the endpoint modules
// (monitoring, edges, configuration, ...) are inherent methods in
// separate files, keeping this one about transport mechanics.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{join_base, token_headers};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Outgoing JSON-RPC envelope. The portal ignores `id`, so it is always 1.
#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: &'a P,
}

/// Raw client for the orchestrator's portal API.
///
/// All methods return the unwrapped `result` member; a response without
/// one is surfaced as [`Error::Portal`] carrying the full body.
pub struct PortalClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl PortalClient {
    /// Build a client that authenticates with an API token.
    ///
    /// `base_url` is the orchestrator root, e.g. `https://vco.example.net`.
    pub fn from_token(
        base_url: &Url,
        token: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(token_headers(token)?)?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http,
            endpoint: join_base(base_url, "portal"),
        }
    }

    /// The fully qualified `/portal/` endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Invoke a portal method and return its `result`.
    pub async fn call<P>(&self, method: &str, params: &P) -> Result<Value, Error>
    where
        P: Serialize + Sync,
    {
        debug!(method, "POST {}", self.endpoint);

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        trace!(method, %status, bytes = body.len(), "portal response");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: format!("portal rejected the API token (HTTP {status})"),
            });
        }

        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, body.clone()))?;

        unwrap_result(method, parsed)
    }

    /// Invoke a portal method and deserialize its `result` into `T`.
    pub async fn call_as<T, P>(&self, method: &str, params: &P) -> Result<T, Error>
    where
        T: DeserializeOwned,
        P: Serialize + Sync,
    {
        let result = self.call(method, params).await?;
        T::deserialize(&result).map_err(|e| Error::deserialization(&e, result.to_string()))
    }
}

/// Pull `result` out of a JSON-RPC response, or fail with the whole body.
fn unwrap_result(method: &str, mut response: Value) -> Result<Value, Error> {
    if let Some(result) = response.as_object_mut().and_then(|o| o.remove("result")) {
        return Ok(result);
    }
    let body = serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string());
    Err(Error::Portal {
        method: method.to_owned(),
        body,
    })
}
