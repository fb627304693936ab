// Hand-crafted async HTTP client for the orchestrator REST v2 API.
//
// Base path: /api/sdwan/v2/enterprises/{enterprise}/
// Auth: Authorization: Token header

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{CreateEdgeRequest, CreatedEdge, Page, RestEdge};
use crate::auth::{join_base, token_headers};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for one enterprise's REST v2 resources.
pub struct SdwanClient {
    http: reqwest::Client,
    origin: Url,
    base_url: Url,
}

impl SdwanClient {
    /// Build from an API token and transport config.
    pub fn from_token(
        origin: &Url,
        enterprise_logical_id: &str,
        token: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(token_headers(token)?)?;
        Ok(Self::with_client(http, origin, enterprise_logical_id))
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, origin: &Url, enterprise_logical_id: &str) -> Self {
        let base_url = join_base(
            origin,
            &format!("api/sdwan/v2/enterprises/{enterprise_logical_id}"),
        );
        Self {
            http,
            origin: origin.clone(),
            base_url,
        }
    }

    /// Resolve a server-relative `_href` against the orchestrator origin.
    pub fn absolute_url(&self, href: &str) -> Result<Url, Error> {
        Ok(self.origin.join(href)?)
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Create an edge under the enterprise.
    ///
    /// `POST /enterprises/{enterprise}/edges`
    pub async fn create_edge(&self, request: &CreateEdgeRequest) -> Result<CreatedEdge, Error> {
        debug!(name = %request.name, model = %request.model_number, "creating edge");
        self.post("edges", request).await
    }

    /// Fetch one page of edges. Pass the previous page's `nextPageLink` to
    /// continue.
    ///
    /// `GET /enterprises/{enterprise}/edges`
    pub async fn list_edges(&self, next_page: Option<&str>) -> Result<Page<RestEdge>, Error> {
        let mut url = self.url("edges")?;
        if let Some(token) = next_page {
            url.query_pairs_mut().append_pair("nextPageLink", token);
        }
        self.get(url).await
    }

    /// Follow `nextPageLink` until the collection is exhausted.
    pub async fn list_all_edges(&self) -> Result<Vec<RestEdge>, Error> {
        let mut all = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let page = self.list_edges(next.as_deref()).await?;
            all.extend(page.data);
            match page.metadata.next_page_link {
                Some(link) if page.metadata.more => next = Some(link),
                _ => break,
            }
        }
        Ok(all)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = rest_error_message(&body).unwrap_or_else(|| {
            let preview: String = body.chars().take(200).collect();
            if preview.is_empty() {
                status.to_string()
            } else {
                preview
            }
        });
        return Err(Error::Rest {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, body))
}

/// REST v2 errors look like `{"code": "...", "message": "..."}`.
fn rest_error_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorResponse {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    let err: ErrorResponse = serde_json::from_str(body).ok()?;
    match (err.code, err.message) {
        (Some(code), Some(message)) => Some(format!("{code}: {message}")),
        (None, Some(message)) => Some(message),
        (Some(code), None) => Some(code),
        (None, None) => None,
    }
}
