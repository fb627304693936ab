//! Edge command handlers.

use tabled::Tabled;

use vco_config::Settings;
use vco_core::EnterpriseEdge;

use crate::cli::{EdgesArgs, EdgesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EdgeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Logical ID")]
    logical_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Version")]
    version: String,
}

impl From<&EnterpriseEdge> for EdgeRow {
    fn from(e: &EnterpriseEdge) -> Self {
        Self {
            id: e.id,
            logical_id: e.logical_id.clone(),
            name: e.name.clone().unwrap_or_default(),
            state: e.edge_state.clone().unwrap_or_default(),
            model: e.model_number.clone().unwrap_or_default(),
            version: e.software_version.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: EdgesArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EdgesCommand::List => {
            let orchestrator = util::connect(settings)?;
            let edges = orchestrator.edges().await?;
            let out = output::render_list(
                &global.output,
                &edges,
                |e| EdgeRow::from(e),
                |e| e.logical_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
