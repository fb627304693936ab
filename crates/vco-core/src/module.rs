// ── Configuration module locator ──
//
// An edge's configuration stack is ordered most specific first; scope 0
// is the device's own configuration. Both pipelines look modules up by
// name in that scope.

use vco_api::{ConfigurationModule, ConfigurationProfile};

use crate::error::CoreError;

/// Module holding the edge's WAN link definitions.
pub const WAN_MODULE: &str = "WAN";
/// Module holding interfaces, routes, segments and the rest of the device config.
pub const DEVICE_SETTINGS_MODULE: &str = "deviceSettings";

fn empty_stack() -> CoreError {
    CoreError::NotFound {
        entity_type: "configuration stack".into(),
        identifier: "device scope".into(),
    }
}

/// Device-specific scope of a configuration stack (its first entry).
pub fn device_scope(stack: &[ConfigurationProfile]) -> Result<&ConfigurationProfile, CoreError> {
    stack.first().ok_or_else(empty_stack)
}

/// Mutable access to the device-specific scope.
pub fn device_scope_mut(
    stack: &mut [ConfigurationProfile],
) -> Result<&mut ConfigurationProfile, CoreError> {
    stack.first_mut().ok_or_else(empty_stack)
}

/// First module named `name`, or `None`.
///
/// Duplicate names are not an error; the first occurrence wins.
pub fn find_module<'a>(
    modules: &'a [ConfigurationModule],
    name: &str,
) -> Option<&'a ConfigurationModule> {
    modules.iter().find(|m| m.name == name)
}

pub fn find_module_mut<'a>(
    modules: &'a mut [ConfigurationModule],
    name: &str,
) -> Option<&'a mut ConfigurationModule> {
    modules.iter_mut().find(|m| m.name == name)
}

/// Take ownership of the named module from the device scope of `stack`.
pub fn take_device_module(
    stack: Vec<ConfigurationProfile>,
    name: &str,
) -> Result<Option<ConfigurationModule>, CoreError> {
    let scope = stack.into_iter().next().ok_or_else(empty_stack)?;
    Ok(scope.modules.into_iter().find(|m| m.name == name))
}
