// ── WAN overlay document ──
//
// A fresh `WAN` module body with one user-defined public link per uplink.
// It replaces whatever the new edge was created with.

use serde_json::{Value, json};
use uuid::Uuid;

use crate::config::ProvisionPolicy;
use crate::model::WanUplink;

/// Build the `WAN` module data for a branch's two uplinks.
///
/// Link `i` is bound to `policy.uplink_interfaces[i]`. Each call mints new
/// `internalId`/`logicalId` values.
pub fn generate_wan_overlay(wans: &[WanUplink; 2], policy: &ProvisionPolicy) -> Value {
    let links: Vec<Value> = wans
        .iter()
        .zip(&policy.uplink_interfaces)
        .map(|(wan, interface)| overlay_link(wan, interface, policy))
        .collect();
    json!({ "links": links })
}

fn overlay_link(wan: &WanUplink, interface: &str, policy: &ProvisionPolicy) -> Value {
    json!({
        "MTU": policy.overlay_mtu,
        "addressingVersion": "IPv4",
        "backupOnly": wan.standby,
        "bwMeasurement": "USER_DEFINED",
        "classesOfService": { "classId": null, "classesOfService": [] },
        "classesOfServiceEnabled": false,
        "customVlanId": false,
        "description": "",
        "discovery": "USER_DEFINED",
        "downstreamMbps": wan.downstream_mbps.to_string(),
        "dscpTag": "",
        "dynamicBwAdjustmentEnabled": false,
        "enable8021P": false,
        "encryptOverlay": true,
        "hotStandby": false,
        "interfaces": [interface],
        "internalId": Uuid::new_v4().to_string(),
        "logicalId": Uuid::new_v4().to_string(),
        "isp": "",
        "lastActive": "",
        "minActiveLinks": 1,
        "mode": "PUBLIC",
        "name": wan.name,
        "nextHopIpAddress": "",
        "overheadBytes": 0,
        "pmtudDisabled": false,
        "priority8021P": 0,
        "privateNetwork": null,
        "publicIpAddress": "",
        "sourceIpAddress": "",
        "staticSLA": { "jitterMs": "0", "latencyMs": "0", "lossPct": "0" },
        "staticSlaEnabled": false,
        "strictIpPrecedence": false,
        "type": "WIRED",
        "udpHolePunching": false,
        "upstreamMbps": wan.upstream_mbps.to_string(),
        "virtualIpAddress": "",
        "vlanId": policy.overlay_vlan_id,
    })
}
