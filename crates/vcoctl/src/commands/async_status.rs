//! One-shot poll of an asynchronous portal operation.

use vco_config::Settings;

use crate::cli::{AsyncStatusArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    args: AsyncStatusArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let orchestrator = util::connect(settings)?;
    let status = orchestrator.async_status(&args.token).await?;
    let out = output::render_single(
        &global.output,
        &status,
        |s| output::render_json(s, false).unwrap_or_else(|_| s.to_string()),
        |s| {
            s.get("status")
                .and_then(|v| v.as_str())
                .map_or_else(|| s.to_string(), str::to_owned)
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
