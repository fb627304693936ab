//! Command dispatch: bridges CLI args -> core pipelines -> output formatting.

pub mod async_status;
pub mod audit;
pub mod edges;
pub mod licenses;
pub mod modules;
pub mod provision;
pub mod util;

use vco_config::Settings;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a loaded-settings command to its handler.
///
/// Each handler connects to the orchestrator itself, so offline paths
/// (`provision --plan`) never require `VCO` / `VCO_TOKEN`.
pub async fn dispatch(
    cmd: Command,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Audit(args) => audit::handle(args, settings, global).await,
        Command::Provision(args) => provision::handle(args, settings, global).await,
        Command::Edges(args) => edges::handle(args, settings, global).await,
        Command::Licenses(args) => licenses::handle(args, settings, global).await,
        Command::Modules(args) => modules::handle(args, settings, global).await,
        Command::AsyncStatus(args) => async_status::handle(args, settings, global).await,
        // Completions are handled before settings are loaded
        Command::Completions(_) => Err(CliError::Internal(
            "completions reached command dispatch".into(),
        )),
    }
}
