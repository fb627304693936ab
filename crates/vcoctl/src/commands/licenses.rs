//! License command handlers.

use tabled::Tabled;

use vco_config::Settings;
use vco_core::EdgeLicense;

use crate::cli::{GlobalOpts, LicensesArgs, LicensesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LicenseRow {
    #[tabled(rename = "Logical ID")]
    logical_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Bandwidth")]
    bandwidth: String,
    #[tabled(rename = "Edition")]
    edition: String,
    #[tabled(rename = "Term (months)")]
    term: i64,
}

impl From<&EdgeLicense> for LicenseRow {
    fn from(l: &EdgeLicense) -> Self {
        Self {
            logical_id: l.logical_id.clone(),
            name: l.name.clone(),
            bandwidth: l.bandwidth_tier.clone(),
            edition: l.edition.clone(),
            term: l.term_months,
        }
    }
}

pub async fn handle(
    args: LicensesArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LicensesCommand::List => {
            let orchestrator = util::connect(settings)?;
            let licenses = orchestrator.licenses().await?;
            let out = output::render_list(
                &global.output,
                &licenses,
                |l| LicenseRow::from(l),
                |l| l.logical_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
