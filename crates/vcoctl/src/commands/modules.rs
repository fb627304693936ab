//! Configuration module inspection.

use vco_config::Settings;

use crate::cli::{GlobalOpts, ModulesArgs, ModulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    args: ModulesArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ModulesCommand::Dump {
            edge_id,
            module,
            out,
        } => {
            let orchestrator = util::connect(settings)?;
            let found = orchestrator.require_device_module(edge_id, &module).await?;
            let pretty = output::render_json(&found, false)?;

            match out {
                Some(path) => {
                    std::fs::write(&path, format!("{pretty}\n"))?;
                    output::success(
                        &format!("{module} of edge {edge_id} written to {}", path.display()),
                        global.quiet,
                    );
                }
                None => output::print_output(&pretty, global.quiet),
            }
            Ok(())
        }
    }
}
