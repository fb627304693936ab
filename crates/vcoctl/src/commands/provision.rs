//! Branch provisioning command handler.

use std::io::IsTerminal;
use std::path::Path;

use serde::Serialize;
use tabled::Tabled;
use tracing::{error, info};

use vco_config::Settings;
use vco_core::{
    BranchSpec, PatchOp, ProvisionOutcome, ProvisionPlan, ProvisionStep, ProvisionedEdge,
    Provisioner,
};

use crate::cli::{GlobalOpts, ProvisionArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OpRow {
    #[tabled(rename = "#")]
    seq: usize,
    #[tabled(rename = "Op")]
    op: &'static str,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "From / Value")]
    detail: String,
}

fn op_row(seq: usize, op: &PatchOp) -> OpRow {
    let (name, detail) = match op {
        PatchOp::Add { value, .. } => ("add", value.to_string()),
        PatchOp::Remove { .. } => ("remove", String::new()),
        PatchOp::Replace { value, .. } => ("replace", value.to_string()),
        PatchOp::Move { from, .. } => ("move", from.to_string()),
    };
    OpRow {
        seq,
        op: name,
        path: op.path().to_string(),
        detail,
    }
}

fn plan_detail(plan: &ProvisionPlan) -> String {
    let rows: Vec<OpRow> = plan
        .device_settings
        .ops()
        .iter()
        .enumerate()
        .map(|(i, op)| op_row(i + 1, op))
        .collect();
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    let overlay = output::render_json(&plan.wan_overlay, false).unwrap_or_default();
    format!("deviceSettings patch:\n{table}\n\nWAN overlay:\n{overlay}")
}

// ── Success summary ─────────────────────────────────────────────────

#[derive(Serialize)]
struct Provisioned<'a> {
    edge: &'a ProvisionedEdge,
    completed: &'a [ProvisionStep],
    skipped: &'a [ProvisionStep],
}

fn steps(list: &[ProvisionStep]) -> String {
    list.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn edge_detail(p: &Provisioned<'_>) -> String {
    let edge = p.edge;
    let mut lines = vec![
        format!("Name:        {}", edge.name),
        format!("Logical ID:  {}", edge.logical_id),
        format!(
            "Edge ID:     {}",
            edge.edge_id.map(|id| id.to_string()).unwrap_or_default()
        ),
        format!("URL:         {}", edge.url),
        format!(
            "Location:    {:.6}, {:.6}",
            edge.location.lat, edge.location.lon
        ),
        format!("Completed:   {}", steps(p.completed)),
    ];
    if !p.skipped.is_empty() {
        lines.push(format!("Skipped:     {}", steps(p.skipped)));
    }
    lines.join("\n")
}

// ── Outcome mapping ─────────────────────────────────────────────────

fn finish(outcome: ProvisionOutcome, global: &GlobalOpts) -> Result<(), CliError> {
    match outcome {
        ProvisionOutcome::Success {
            edge,
            completed,
            skipped,
        } => {
            let summary = Provisioned {
                edge: &edge,
                completed: &completed,
                skipped: &skipped,
            };
            let out = output::render_single(&global.output, &summary, edge_detail, |p| {
                p.edge.logical_id.clone()
            })?;
            output::print_output(&out, global.quiet);
            output::success(&format!("Branch '{}' provisioned", edge.name), global.quiet);
            Ok(())
        }

        ProvisionOutcome::PartiallyProvisioned {
            edge,
            completed,
            failed_step,
            reason,
        } => Err(CliError::PartiallyProvisioned {
            name: edge.name,
            logical_id: edge.logical_id,
            url: edge.url,
            failed_step: failed_step.to_string(),
            completed: steps(&completed),
            source: Box::new(reason),
        }),

        ProvisionOutcome::Failed {
            failed_step,
            reason,
        } => {
            error!(step = %failed_step, "provisioning failed before an edge was created");
            Err(reason.into())
        }
    }
}

// ── ZScaler gate ────────────────────────────────────────────────────

const ZSCALER_PROMPT: &str = "Is the edge activated and online? Configure ZScaler now";

/// Decide whether to push ZScaler for a freshly created edge.
///
/// Only `--zscaler-now` opts in. `ask` is consulted after that and may
/// still decline; an error from it skips the step.
fn configure_zscaler(requested: bool, ask: impl FnOnce() -> Result<bool, CliError>) -> bool {
    if !requested {
        output::warning("ZScaler skipped; pass --zscaler-now once the edge is online");
        return false;
    }
    match ask() {
        Ok(answer) => answer,
        Err(err) => {
            output::warning(&format!("{err}; skipping ZScaler"));
            false
        }
    }
}

/// Operator confirmation for `--zscaler-now`. Off a terminal the flag
/// itself is the confirmation.
fn confirm_online() -> Result<bool, CliError> {
    if std::io::stdin().is_terminal() {
        util::confirm(ZSCALER_PROMPT, false)
    } else {
        Ok(true)
    }
}

// ── Handlers ────────────────────────────────────────────────────────

fn plan(
    branch: &BranchSpec,
    device_settings: &Path,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let doc = util::module_data(util::read_json_file(device_settings)?);
    let plan = vco_core::provision::plan(branch, &doc, &settings.provision)?;
    info!(ops = plan.device_settings.len(), "built provisioning plan");

    let out = output::render_single(&global.output, &plan, plan_detail, |p| {
        p.device_settings
            .ops()
            .iter()
            .map(|op| op.path().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    args: ProvisionArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let branch = vco_config::load_branch(&args.branch_file)?;

    if args.plan {
        let path = args.device_settings.ok_or_else(|| CliError::Validation {
            field: "--device-settings".into(),
            reason: "required with --plan".into(),
        })?;
        return plan(&branch, &path, settings, global);
    }

    let ctx = vco_config::provision_context(settings, vco_config::process_env)?;
    let orchestrator = util::connect(settings)?;
    if ctx.zscaler_subscription_logical_id.is_none() {
        info!("{} not set; ZScaler step will be skipped", vco_config::ENV_ZSCALER);
    }

    let (zscaler_now, quiet) = (args.zscaler_now, global.quiet);
    let outcome = Provisioner::new(&orchestrator, &ctx)
        .run(&branch, |edge| {
            output::success(
                &format!("Edge '{}' configured: {}", edge.name, edge.url),
                quiet,
            );
            configure_zscaler(zscaler_now, confirm_online)
        })
        .await;

    finish(outcome, global)
}
