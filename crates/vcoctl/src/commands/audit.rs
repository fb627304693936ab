//! Bandwidth audit command handler.

use tabled::Tabled;
use tracing::info;

use vco_config::Settings;
use vco_core::{AuditMode, AuditReport, Auditor, LinkMetric};

use crate::cli::{AuditArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AffectedRow {
    #[tabled(rename = "Edge ID")]
    edge_id: i64,
    #[tabled(rename = "Edge")]
    edge: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "ISP")]
    isp: String,
    #[tabled(rename = "Down (Mbps)")]
    down: String,
    #[tabled(rename = "Up (Mbps)")]
    up: String,
}

impl From<&LinkMetric> for AffectedRow {
    fn from(l: &LinkMetric) -> Self {
        Self {
            edge_id: l.edge_id,
            edge: l.edge_name.clone(),
            link: l.link_name.clone(),
            isp: l.isp.clone(),
            down: format!("{:.2}", l.downstream_mbps),
            up: format!("{:.2}", l.upstream_mbps),
        }
    }
}

fn summary(report: &AuditReport, mode: AuditMode, report_path: &str) -> String {
    let mut line = format!(
        "{} affected link(s) out of {} candidate(s) on {} edge(s)",
        report.affected.len(),
        report.candidates,
        report.edges_scanned,
    );
    if report.edges_skipped > 0 {
        line.push_str(&format!(", {} skipped without a WAN module", report.edges_skipped));
    }
    match mode {
        AuditMode::Apply => line.push_str(&format!("; {} edge(s) updated", report.edges_updated)),
        AuditMode::AuditOnly => line.push_str("; audit only, re-run with --apply to push"),
    }
    line.push_str(&format!(". Report: {report_path}"));
    line
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: AuditArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut policy = settings.audit.clone();
    if args.apply {
        policy.mode = AuditMode::Apply;
    }
    if let Some(path) = args.output_file {
        policy.report_path = path;
    }
    if let Some(mins) = args.lookback {
        policy.lookback_mins = mins;
    }

    let orchestrator = util::connect(settings)?;
    info!(
        mode = ?policy.mode,
        window = %humantime::format_duration(policy.lookback()),
        "starting bandwidth audit"
    );

    let report = Auditor::new(&orchestrator, &policy).run().await?;
    vco_core::report::write_csv_file(&policy.report_path, &report.affected)?;
    info!(path = %policy.report_path.display(), rows = report.affected.len(), "report written");

    let out = output::render_list(
        &global.output,
        &report.affected,
        |l| AffectedRow::from(l),
        |l| l.link_internal_id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    output::success(
        &summary(&report, policy.mode, &policy.report_path.display().to_string()),
        global.quiet,
    );
    Ok(())
}
