// ── Orchestrator session ──
//
// Owns the API clients for one orchestrator and exposes the handful of
// domain-level reads and writes both pipelines share. There is no
// background state: every method is a direct, awaited round trip.

use serde_json::Value;
use tracing::debug;

use vco_api::transport::{TlsMode, TransportConfig};
use vco_api::{
    ConfigurationModule, ConfigurationProfile, EdgeLicense, EnterpriseEdge, GeocodeClient,
    PortalClient, SdwanClient,
};

use crate::config::{OrchestratorConfig, TlsVerification};
use crate::error::CoreError;
use crate::module::take_device_module;

/// Entry point for talking to an orchestrator.
pub struct Orchestrator {
    config: OrchestratorConfig,
    transport: TransportConfig,
    portal: PortalClient,
}

impl Orchestrator {
    /// Build the portal client. No request is sent until the first call.
    pub fn new(config: OrchestratorConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let portal = PortalClient::from_token(&config.url, &config.token, &transport)?;
        Ok(Self {
            config,
            transport,
            portal,
        })
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn portal(&self) -> &PortalClient {
        &self.portal
    }

    /// REST v2 client scoped to one enterprise.
    pub fn sdwan(&self, enterprise_logical_id: &str) -> Result<SdwanClient, CoreError> {
        Ok(SdwanClient::from_token(
            &self.config.url,
            enterprise_logical_id,
            &self.config.token,
            &self.transport,
        )?)
    }

    /// Geocoding client sharing this session's TLS and timeout settings.
    pub fn geocoder(
        &self,
        api_key: secrecy::SecretString,
        endpoint: Option<&url::Url>,
    ) -> Result<GeocodeClient, CoreError> {
        match endpoint {
            Some(url) => Ok(GeocodeClient::with_client(
                self.transport.build_client()?,
                url.clone(),
                api_key,
            )),
            None => Ok(GeocodeClient::new(api_key, &self.transport)?),
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    pub async fn configuration_stack(
        &self,
        edge_id: i64,
    ) -> Result<Vec<ConfigurationProfile>, CoreError> {
        Ok(self.portal.get_edge_configuration_stack(edge_id).await?)
    }

    /// Named module from the edge's device scope, or `None` if absent.
    pub async fn device_module(
        &self,
        edge_id: i64,
        name: &str,
    ) -> Result<Option<ConfigurationModule>, CoreError> {
        let stack = self.configuration_stack(edge_id).await?;
        take_device_module(stack, name)
    }

    /// Like [`device_module`](Self::device_module), but absence is an error.
    pub async fn require_device_module(
        &self,
        edge_id: i64,
        name: &str,
    ) -> Result<ConfigurationModule, CoreError> {
        self.device_module(edge_id, name)
            .await?
            .ok_or_else(|| CoreError::ModuleNotFound {
                module: name.to_owned(),
                edge_id,
            })
    }

    /// Replace a module's data, leaving its refs alone.
    pub async fn push_module_data(&self, module_id: i64, data: &Value) -> Result<(), CoreError> {
        debug!(module_id, "pushing module data");
        self.portal
            .update_configuration_module(module_id, data, None)
            .await?;
        Ok(())
    }

    /// Replace a module's data and refs together.
    pub async fn push_module(&self, module: &ConfigurationModule) -> Result<(), CoreError> {
        debug!(module_id = module.id, name = %module.name, "pushing module data and refs");
        self.portal
            .update_configuration_module(module.id, &module.data, module.refs.as_ref())
            .await?;
        Ok(())
    }

    // ── Enterprise ───────────────────────────────────────────────────

    pub async fn edges(&self) -> Result<Vec<EnterpriseEdge>, CoreError> {
        Ok(self.portal.get_enterprise_edges().await?)
    }

    /// Numeric id of the edge with `logical_id`.
    pub async fn resolve_edge_id(&self, logical_id: &str) -> Result<i64, CoreError> {
        self.portal
            .find_edge(logical_id)
            .await?
            .map(|edge| edge.id)
            .ok_or_else(|| CoreError::EdgeNotFound {
                logical_id: logical_id.to_owned(),
            })
    }

    pub async fn licenses(&self) -> Result<Vec<EdgeLicense>, CoreError> {
        Ok(self.portal.get_enterprise_edge_licenses().await?)
    }

    pub async fn async_status(&self, api_token: &str) -> Result<Value, CoreError> {
        Ok(self.portal.get_async_status(api_token).await?)
    }
}

fn build_transport(config: &OrchestratorConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
