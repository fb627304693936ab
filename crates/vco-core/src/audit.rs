// ── Bandwidth audit ──
//
// Links stuck in SLOW_START on burst-mode circuits report throughput in a
// narrow band just under the provisioned rate. The audit finds those links
// from recent telemetry, confirms each against the live `WAN` module and
// pins its measurement mode to STATIC.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use vco_api::Interval;
use vco_api::portal::monitoring::{METRIC_BEST_PATH_RX, METRIC_BEST_PATH_TX};

use crate::config::{AuditMode, AuditPolicy, BurstThresholds};
use crate::error::CoreError;
use crate::model::{BwMeasurement, LinkMetric};
use crate::module::WAN_MODULE;
use crate::orchestrator::Orchestrator;

/// Result of one audit run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    /// Links inside the threshold band.
    pub candidates: usize,
    pub edges_scanned: usize,
    /// Edges with no `WAN` module in their device scope.
    pub edges_skipped: usize,
    pub edges_updated: usize,
    /// Candidates confirmed as SLOW_START and flipped.
    pub affected: Vec<LinkMetric>,
    pub edges: Vec<EdgeAudit>,
}

/// Per-edge outcome.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeAudit {
    pub edge_id: i64,
    pub module_id: i64,
    pub confirmed: usize,
    pub pushed: bool,
    /// The `WAN` data after in-memory correction.
    #[serde(skip)]
    pub wan_data: Value,
}

// ── Pure steps ──────────────────────────────────────────────────────

/// Whether a link sits in the burst-failure band. All bounds are strict.
pub fn is_candidate(link: &LinkMetric, thresholds: &BurstThresholds) -> bool {
    link.downstream_mbps > thresholds.min_downstream_mbps
        && link.downstream_mbps < thresholds.max_downstream_mbps
        && link.upstream_mbps < thresholds.max_upstream_mbps
}

/// Keep candidate links, grouped by edge id in ascending order.
pub fn classify(
    links: &[LinkMetric],
    thresholds: &BurstThresholds,
) -> BTreeMap<i64, Vec<LinkMetric>> {
    let mut by_edge: BTreeMap<i64, Vec<LinkMetric>> = BTreeMap::new();
    for link in links.iter().filter(|l| is_candidate(l, thresholds)) {
        by_edge.entry(link.edge_id).or_default().push(link.clone());
    }
    by_edge
}

/// Flip matching SLOW_START links in `wan_data.links[]` to STATIC.
///
/// A link matches when its `internalId` equals a candidate's
/// `link_internal_id`. Returns the candidate rows that were confirmed.
/// Links in any other mode are left as they are, so a second pass finds
/// nothing to change.
pub fn confirm_and_fix(wan_data: &mut Value, candidates: &[LinkMetric]) -> Vec<LinkMetric> {
    let Some(links) = wan_data.get_mut("links").and_then(Value::as_array_mut) else {
        return Vec::new();
    };

    let mut confirmed = Vec::new();
    for link in links.iter_mut() {
        let slow_start = link
            .get("bwMeasurement")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<BwMeasurement>().ok())
            == Some(BwMeasurement::SlowStart);
        if !slow_start {
            continue;
        }
        let Some(internal_id) = link.get("internalId").and_then(Value::as_str) else {
            continue;
        };

        let matches: Vec<&LinkMetric> = candidates
            .iter()
            .filter(|c| c.link_internal_id == internal_id)
            .collect();
        if matches.is_empty() {
            continue;
        }

        link["bwMeasurement"] = Value::String(BwMeasurement::Static.to_string());
        confirmed.extend(matches.into_iter().cloned());
    }
    confirmed
}

// ── Auditor ─────────────────────────────────────────────────────────

/// Runs the audit against one orchestrator.
pub struct Auditor<'a> {
    orchestrator: &'a Orchestrator,
    policy: &'a AuditPolicy,
}

impl<'a> Auditor<'a> {
    pub fn new(orchestrator: &'a Orchestrator, policy: &'a AuditPolicy) -> Self {
        Self {
            orchestrator,
            policy,
        }
    }

    /// Best-path throughput for every link over the lookback window.
    pub async fn fetch_links(&self) -> Result<Vec<LinkMetric>, CoreError> {
        let lookback_ms = i64::try_from(self.policy.lookback().as_millis()).unwrap_or(i64::MAX);
        let interval = Interval {
            start: Utc::now().timestamp_millis().saturating_sub(lookback_ms),
            end: None,
        };

        let entries = self
            .orchestrator
            .portal()
            .get_aggregate_edge_link_metrics(&[METRIC_BEST_PATH_RX, METRIC_BEST_PATH_TX], interval)
            .await?;
        Ok(entries.into_iter().map(LinkMetric::from).collect())
    }

    /// Fetch, classify, confirm per edge and (in apply mode) push.
    ///
    /// Any RPC failure aborts the run. The report file is the caller's job.
    pub async fn run(&self) -> Result<AuditReport, CoreError> {
        let links = self.fetch_links().await?;
        let by_edge = classify(&links, &self.policy.thresholds);
        let candidates = by_edge.values().map(Vec::len).sum();
        info!(
            links = links.len(),
            candidates,
            edges = by_edge.len(),
            "classified link telemetry"
        );

        let mut report = AuditReport {
            candidates,
            ..AuditReport::default()
        };

        for (i, (edge_id, edge_candidates)) in by_edge.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.policy.edge_pause()).await;
            }
            report.edges_scanned += 1;

            let Some(mut wan) = self
                .orchestrator
                .device_module(*edge_id, WAN_MODULE)
                .await?
            else {
                warn!(edge_id, "no WAN module in device scope; skipping edge");
                report.edges_skipped += 1;
                continue;
            };

            let confirmed = confirm_and_fix(&mut wan.data, edge_candidates);
            debug!(edge_id, confirmed = confirmed.len(), "cross-referenced WAN links");

            let pushed = !confirmed.is_empty() && self.policy.mode == AuditMode::Apply;
            if pushed {
                self.orchestrator.push_module_data(wan.id, &wan.data).await?;
                report.edges_updated += 1;
                info!(edge_id, links = confirmed.len(), "pinned links to STATIC");
            }

            report.edges.push(EdgeAudit {
                edge_id: *edge_id,
                module_id: wan.id,
                confirmed: confirmed.len(),
                pushed,
                wan_data: wan.data,
            });
            report.affected.extend(confirmed);
        }

        Ok(report)
    }
}
