// ── Branch provisioning ──
//
// Strictly sequential: geocode, create the edge, resolve its numeric id,
// patch `deviceSettings`, replace `WAN`, and optionally configure ZScaler
// once the operator reports the edge online. Nothing is rolled back; a
// failure after edge creation leaves a partially provisioned edge, which
// the outcome names explicitly.

use serde::Serialize;
use serde_json::Value;
use strum::Display;
use tracing::{debug, info};

use vco_api::{CreateEdgeRequest, EdgeSite, LatLon};

use crate::config::{ProvisionContext, ProvisionPolicy};
use crate::error::CoreError;
use crate::model::BranchSpec;
use crate::module::{DEVICE_SETTINGS_MODULE, WAN_MODULE, find_module, take_device_module};
use crate::orchestrator::Orchestrator;
use crate::overlay::generate_wan_overlay;
use crate::patch::{PatchBatch, build_device_settings_batch};
use crate::zscaler::build_zscaler_patch;

/// A provisioning step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProvisionStep {
    Validate,
    Geocode,
    CreateEdge,
    ResolveEdgeId,
    PatchDeviceSettings,
    ReplaceWanOverlay,
    ConfigureZscaler,
}

/// The edge a run created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionedEdge {
    pub name: String,
    pub logical_id: String,
    /// Numeric id, once resolved.
    pub edge_id: Option<i64>,
    /// Absolute link to the edge resource.
    pub url: String,
    pub location: LatLon,
}

/// How a provisioning run ended.
#[derive(Debug)]
pub enum ProvisionOutcome {
    Success {
        edge: ProvisionedEdge,
        completed: Vec<ProvisionStep>,
        /// Optional steps not run (no subscription, or the operator declined).
        skipped: Vec<ProvisionStep>,
    },
    /// The edge exists but configuration stopped at `failed_step`.
    PartiallyProvisioned {
        edge: ProvisionedEdge,
        completed: Vec<ProvisionStep>,
        failed_step: ProvisionStep,
        reason: CoreError,
    },
    /// Nothing was created.
    Failed {
        failed_step: ProvisionStep,
        reason: CoreError,
    },
}

impl ProvisionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The created edge, if creation got that far.
    pub fn edge(&self) -> Option<&ProvisionedEdge> {
        match self {
            Self::Success { edge, .. } | Self::PartiallyProvisioned { edge, .. } => Some(edge),
            Self::Failed { .. } => None,
        }
    }

    pub fn completed(&self) -> &[ProvisionStep] {
        match self {
            Self::Success { completed, .. } | Self::PartiallyProvisioned { completed, .. } => {
                completed
            }
            Self::Failed { .. } => &[],
        }
    }
}

/// Offline preview of the configuration a branch would receive.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionPlan {
    pub device_settings: PatchBatch,
    pub wan_overlay: Value,
}

/// Build the `deviceSettings` batch and WAN overlay without any network access.
pub fn plan(
    branch: &BranchSpec,
    device_settings: &Value,
    policy: &ProvisionPolicy,
) -> Result<ProvisionPlan, CoreError> {
    branch.validate()?;
    let batch = build_device_settings_batch(branch, device_settings, policy)?;
    // Surface apply failures (missing keys, bad indices) in the preview too.
    batch.applied_to(device_settings)?;
    Ok(ProvisionPlan {
        device_settings: batch,
        wan_overlay: generate_wan_overlay(&branch.wans, policy),
    })
}

type StepResult<T> = Result<T, (ProvisionStep, CoreError)>;

fn at(step: ProvisionStep) -> impl FnOnce(CoreError) -> (ProvisionStep, CoreError) {
    move |err| (step, err)
}

/// Provisions branches against one orchestrator.
pub struct Provisioner<'a> {
    orchestrator: &'a Orchestrator,
    ctx: &'a ProvisionContext,
}

impl<'a> Provisioner<'a> {
    pub fn new(orchestrator: &'a Orchestrator, ctx: &'a ProvisionContext) -> Self {
        Self { orchestrator, ctx }
    }

    /// Run every step for `branch`.
    ///
    /// `confirm_online` is asked, after the core configuration is pushed,
    /// whether the edge is activated and online. Returning `false` skips
    /// the ZScaler step. It is not called when no subscription is configured.
    pub async fn run<F>(&self, branch: &BranchSpec, confirm_online: F) -> ProvisionOutcome
    where
        F: FnOnce(&ProvisionedEdge) -> bool,
    {
        if let Err(reason) = branch.validate() {
            return ProvisionOutcome::Failed {
                failed_step: ProvisionStep::Validate,
                reason,
            };
        }
        let mut completed = vec![ProvisionStep::Validate];

        let location = match self.geocode(branch).await {
            Ok(location) => location,
            Err(reason) => {
                return ProvisionOutcome::Failed {
                    failed_step: ProvisionStep::Geocode,
                    reason,
                };
            }
        };
        completed.push(ProvisionStep::Geocode);

        let mut edge = match self.create_edge(branch, location).await {
            Ok(edge) => edge,
            Err(reason) => {
                return ProvisionOutcome::Failed {
                    failed_step: ProvisionStep::CreateEdge,
                    reason,
                };
            }
        };
        completed.push(ProvisionStep::CreateEdge);
        info!(logical_id = %edge.logical_id, url = %edge.url, "edge created");

        match self
            .configure(branch, &mut edge, &mut completed, confirm_online)
            .await
        {
            Ok(skipped) => {
                info!(name = %edge.name, "provisioning complete");
                ProvisionOutcome::Success {
                    edge,
                    completed,
                    skipped,
                }
            }
            Err((failed_step, reason)) => ProvisionOutcome::PartiallyProvisioned {
                edge,
                completed,
                failed_step,
                reason,
            },
        }
    }

    /// Steps after edge creation. Returns the skipped optional steps.
    async fn configure<F>(
        &self,
        branch: &BranchSpec,
        edge: &mut ProvisionedEdge,
        completed: &mut Vec<ProvisionStep>,
        confirm_online: F,
    ) -> StepResult<Vec<ProvisionStep>>
    where
        F: FnOnce(&ProvisionedEdge) -> bool,
    {
        let edge_id = self
            .orchestrator
            .resolve_edge_id(&edge.logical_id)
            .await
            .map_err(at(ProvisionStep::ResolveEdgeId))?;
        edge.edge_id = Some(edge_id);
        completed.push(ProvisionStep::ResolveEdgeId);
        info!(edge_id, "resolved edge id");

        let stack = self
            .orchestrator
            .configuration_stack(edge_id)
            .await
            .map_err(at(ProvisionStep::PatchDeviceSettings))?;
        let wan_module_id = crate::module::device_scope(&stack)
            .ok()
            .and_then(|scope| find_module(&scope.modules, WAN_MODULE))
            .map(|m| m.id);

        self.patch_device_settings(branch, edge_id, stack)
            .await
            .map_err(at(ProvisionStep::PatchDeviceSettings))?;
        completed.push(ProvisionStep::PatchDeviceSettings);

        self.replace_wan_overlay(branch, edge_id, wan_module_id)
            .await
            .map_err(at(ProvisionStep::ReplaceWanOverlay))?;
        completed.push(ProvisionStep::ReplaceWanOverlay);

        let Some(subscription) = self.ctx.zscaler_subscription_logical_id.as_deref() else {
            debug!("no cloud-security subscription configured");
            return Ok(vec![ProvisionStep::ConfigureZscaler]);
        };
        if !confirm_online(&*edge) {
            info!("ZScaler configuration skipped by operator");
            return Ok(vec![ProvisionStep::ConfigureZscaler]);
        }
        self.configure_zscaler(branch, edge_id, subscription)
            .await
            .map_err(at(ProvisionStep::ConfigureZscaler))?;
        completed.push(ProvisionStep::ConfigureZscaler);
        Ok(Vec::new())
    }

    async fn geocode(&self, branch: &BranchSpec) -> Result<LatLon, CoreError> {
        let geocoder = self.orchestrator.geocoder(
            self.ctx.geocode_api_key.clone(),
            self.ctx.geocode_endpoint.as_ref(),
        )?;
        let location = geocoder
            .lookup(&branch.postal_code, &branch.country)
            .await?;
        info!(lat = location.lat, lon = location.lon, "geocoded site");
        Ok(location)
    }

    async fn create_edge(
        &self,
        branch: &BranchSpec,
        location: LatLon,
    ) -> Result<ProvisionedEdge, CoreError> {
        let sdwan = self.orchestrator.sdwan(&self.ctx.enterprise_logical_id)?;
        let request = CreateEdgeRequest {
            model_number: self.ctx.policy.edge_model.clone(),
            profile: self.ctx.profile_logical_id.clone(),
            name: branch.name.clone(),
            license: self.ctx.license_logical_id.clone(),
            ha_enabled: self.ctx.policy.ha_enabled,
            site: EdgeSite {
                lat: location.lat,
                lon: location.lon,
                contact_name: branch.contact_name.clone(),
                contact_email: branch.contact_email.clone(),
            },
        };
        let created = sdwan.create_edge(&request).await?;
        let url = sdwan.absolute_url(&created.href)?;
        Ok(ProvisionedEdge {
            name: branch.name.clone(),
            logical_id: created.logical_id,
            edge_id: None,
            url: url.to_string(),
            location,
        })
    }

    async fn patch_device_settings(
        &self,
        branch: &BranchSpec,
        edge_id: i64,
        stack: Vec<vco_api::ConfigurationProfile>,
    ) -> Result<(), CoreError> {
        let mut module = take_device_module(stack, DEVICE_SETTINGS_MODULE)?.ok_or_else(|| {
            CoreError::ModuleNotFound {
                module: DEVICE_SETTINGS_MODULE.into(),
                edge_id,
            }
        })?;

        let batch = build_device_settings_batch(branch, &module.data, &self.ctx.policy)?;
        batch.apply(&mut module.data)?;
        debug!(ops = batch.len(), module_id = module.id, "applied deviceSettings batch");

        self.orchestrator
            .push_module_data(module.id, &module.data)
            .await?;
        info!(edge_id, "deviceSettings updated");
        Ok(())
    }

    async fn replace_wan_overlay(
        &self,
        branch: &BranchSpec,
        edge_id: i64,
        wan_module_id: Option<i64>,
    ) -> Result<(), CoreError> {
        let module_id = wan_module_id.ok_or_else(|| CoreError::ModuleNotFound {
            module: WAN_MODULE.into(),
            edge_id,
        })?;
        let overlay = generate_wan_overlay(&branch.wans, &self.ctx.policy);
        self.orchestrator.push_module_data(module_id, &overlay).await?;
        info!(edge_id, "WAN overlay replaced");
        Ok(())
    }

    /// Refetch `deviceSettings` and push the cloud-security patch (data and refs).
    pub async fn configure_zscaler(
        &self,
        branch: &BranchSpec,
        edge_id: i64,
        subscription_logical_id: &str,
    ) -> Result<(), CoreError> {
        let mut module = self
            .orchestrator
            .require_device_module(edge_id, DEVICE_SETTINGS_MODULE)
            .await?;
        let patch = build_zscaler_patch(branch, &module, subscription_logical_id)?;
        patch.apply(&mut module)?;
        self.orchestrator.push_module(&module).await?;
        info!(edge_id, "ZScaler settings updated");
        Ok(())
    }
}
