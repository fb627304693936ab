//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use vco_config::Settings;
use vco_core::Orchestrator;

use crate::error::CliError;

/// Build an orchestrator from `VCO` / `VCO_TOKEN` and the loaded settings.
pub fn connect(settings: &Settings) -> Result<Orchestrator, CliError> {
    let config = vco_config::orchestrator_config(settings, vco_config::process_env)?;
    debug!(url = %config.url, timeout = ?config.timeout, "connecting to orchestrator");
    Ok(Orchestrator::new(config)?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Module data from either a bare `data` document or a whole dumped module.
pub fn module_data(doc: Value) -> Value {
    match doc {
        Value::Object(mut map) if map.contains_key("name") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
