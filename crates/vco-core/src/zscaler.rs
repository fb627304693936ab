// ── ZScaler cloud-security settings ──
//
// The `zscaler` subtree of `deviceSettings` only appears once the edge has
// activated and the orchestrator has attached the enterprise's cloud
// security service. The patch is therefore built from a fresh fetch and
// touches both the module `data` and its `refs`.

use serde_json::{Value, json};
use vco_api::ConfigurationModule;

use crate::error::CoreError;
use crate::model::BranchSpec;
use crate::patch::{PatchBatch, PatchOp, Pointer};

/// `refs` key linking `deviceSettings` to the cloud-security subscription.
pub const ZSCALER_DEPLOYMENT_REF: &str = "deviceSettings:zscaler:deployment";

/// Edits to both halves of a `deviceSettings` module.
#[derive(Debug, Clone, PartialEq)]
pub struct ZscalerPatch {
    pub data: PatchBatch,
    pub refs: PatchBatch,
}

impl ZscalerPatch {
    /// Apply both batches to `module`, or neither.
    pub fn apply(&self, module: &mut ConfigurationModule) -> Result<(), CoreError> {
        let data = self.data.applied_to(&module.data)?;
        let current_refs = match &module.refs {
            Some(refs @ Value::Object(_)) => refs.clone(),
            _ => json!({}),
        };
        let refs = self.refs.applied_to(&current_refs)?;
        module.data = data;
        module.refs = Some(refs);
        Ok(())
    }
}

/// Build the cloud-security patch for a branch from a freshly fetched module.
///
/// Fails with `NotFound` when the server has not populated `zscaler` yet.
pub fn build_zscaler_patch(
    branch: &BranchSpec,
    device_settings: &ConfigurationModule,
    subscription_logical_id: &str,
) -> Result<ZscalerPatch, CoreError> {
    if !device_settings
        .data
        .get("zscaler")
        .is_some_and(Value::is_object)
    {
        return Err(CoreError::NotFound {
            entity_type: "zscaler settings".into(),
            identifier: format!(
                "deviceSettings module {} (is the edge activated?)",
                device_settings.id
            ),
        });
    }

    let corporate: Vec<String> = branch.corporate_nets.iter().map(ToString::to_string).collect();
    let config = json!({
        "enabled": true,
        "location": { "name": branch.name },
        "subLocations": [
            { "name": "CORP", "ipAddresses": corporate },
            { "name": "BYOD", "ipAddresses": [branch.byod_net.to_string()] },
            { "name": "GUEST", "ipAddresses": [branch.guest_net.to_string()] }
        ]
    });

    let data = PatchBatch::from_iter([PatchOp::add(
        Pointer::root().key("zscaler").key("config"),
        config,
    )]);
    let refs = PatchBatch::from_iter([PatchOp::add(
        Pointer::root().key(ZSCALER_DEPLOYMENT_REF),
        json!({ "logicalId": subscription_logical_id }),
    )]);

    Ok(ZscalerPatch { data, refs })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::model::branch::tests::sample_branch;

    fn module(data: Value, refs: Option<Value>) -> ConfigurationModule {
        ConfigurationModule {
            id: 501,
            name: "deviceSettings".into(),
            data,
            refs,
            extra: Map::new(),
        }
    }

    #[test]
    fn not_activated_edge_is_not_found() {
        let m = module(json!({ "lan": {} }), None);
        let err = build_zscaler_patch(&sample_branch(), &m, "sub-1").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn patches_data_and_refs() {
        let mut m = module(json!({ "zscaler": { "deployment": {} } }), None);
        let patch = build_zscaler_patch(&sample_branch(), &m, "sub-1").unwrap();
        patch.apply(&mut m).unwrap();

        assert_eq!(m.data["zscaler"]["config"]["enabled"], true);
        assert_eq!(m.data["zscaler"]["config"]["location"]["name"], "branch-042");
        assert_eq!(
            m.data["zscaler"]["config"]["subLocations"][0]["ipAddresses"],
            json!(["10.42.10.0/24", "10.42.20.0/23"])
        );
        assert!(m.data["zscaler"]["deployment"].is_object());
        assert_eq!(
            m.refs.unwrap()[ZSCALER_DEPLOYMENT_REF]["logicalId"],
            "sub-1"
        );
    }

    #[test]
    fn existing_refs_are_kept() {
        let refs = json!({ "deviceSettings:lan:allocation": { "logicalId": "net-1" } });
        let mut m = module(json!({ "zscaler": {} }), Some(refs));
        build_zscaler_patch(&sample_branch(), &m, "sub-1")
            .unwrap()
            .apply(&mut m)
            .unwrap();
        let refs = m.refs.unwrap();
        assert_eq!(refs["deviceSettings:lan:allocation"]["logicalId"], "net-1");
        assert_eq!(refs[ZSCALER_DEPLOYMENT_REF]["logicalId"], "sub-1");
    }
}
