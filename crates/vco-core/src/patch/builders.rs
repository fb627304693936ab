// ── deviceSettings patch builders ──
//
// Each builder returns the operations for one concern. The batch builder
// resolves every interface against the fetched document before emitting
// anything, so a missing interface fails before any edit exists.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use serde_json::{Value, json};

use super::view::{DeviceSettingsView, InterfaceRef, routed_interface};
use super::{PatchBatch, PatchOp, Pointer};
use crate::config::ProvisionPolicy;
use crate::error::CoreError;
use crate::model::{BranchSpec, WanUplink};

/// Address assigned to the default LAN VLAN to take it out of service.
const PARKED_VLAN_ADDRESS: &str = "169.254.255.255";
const PARKED_VLAN_NETMASK: &str = "255.255.255.255";

/// Transit subinterface carrying the BYOD network.
const BYOD_SUBINTERFACE: usize = 0;
/// Transit subinterface carrying the guest network.
const GUEST_SUBINTERFACE: usize = 1;

/// An IPv4 address within a subnet, optionally with a next hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Assignment {
    pub address: Ipv4Addr,
    pub network: Ipv4Net,
    pub gateway: Option<Ipv4Addr>,
}

impl Ipv4Assignment {
    pub fn new(address: Ipv4Addr, network: Ipv4Net) -> Self {
        Self {
            address,
            network,
            gateway: None,
        }
    }

    #[must_use]
    pub fn with_gateway(mut self, gateway: Ipv4Addr) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// `add` operations for `cidrIp`, `cidrPrefix` (numeric), `netmask` and
    /// `gateway` beneath `base`.
    pub(crate) fn ops(&self, base: Pointer) -> Vec<PatchOp> {
        let mut ops = vec![
            PatchOp::add(base.clone().key("cidrIp"), self.address.to_string()),
            PatchOp::add(base.clone().key("cidrPrefix"), self.network.prefix_len()),
            PatchOp::add(base.clone().key("netmask"), self.network.netmask().to_string()),
        ];
        if let Some(gateway) = self.gateway {
            ops.push(PatchOp::add(base.key("gateway"), gateway.to_string()));
        }
        ops
    }
}

/// One static route per corporate subnet, via the LAN core on the transit link.
pub fn static_routes(
    branch: &BranchSpec,
    policy: &ProvisionPolicy,
) -> Result<Vec<PatchOp>, CoreError> {
    let next_hop = branch.transit_peer()?;
    let target = Pointer::root()
        .key("segments")
        .index(0)
        .key("routes")
        .key("static")
        .append();

    Ok(branch
        .corporate_nets
        .iter()
        .map(|net| {
            PatchOp::add(
                target.clone(),
                json!({
                    "advertise": true,
                    "cidrPrefix": net.prefix_len().to_string(),
                    "cost": 0,
                    "description": "",
                    "destination": net.network().to_string(),
                    "gateway": next_hop.to_string(),
                    "icmpProbeLogicalId": null,
                    "netmask": net.netmask().to_string(),
                    "preferred": true,
                    "sourceIp": null,
                    "subinterfaceId": -1,
                    "vlanId": null,
                    "wanInterface": policy.transit_interface,
                }),
            )
        })
        .collect())
}

/// Park LAN network 0 on an unroutable /32.
pub fn vlan_park() -> Vec<PatchOp> {
    let base = Pointer::root().key("lan").key("networks").index(0);
    vec![
        PatchOp::add(base.clone().key("cidrIp"), PARKED_VLAN_ADDRESS),
        PatchOp::add(base.clone().key("netmask"), PARKED_VLAN_NETMASK),
        PatchOp::add(base.key("cidrPrefix"), "32"),
    ]
}

/// Static addressing and probe interval for a WAN-facing interface.
pub fn wan_uplink(
    interface: &InterfaceRef,
    uplink: &WanUplink,
    probe_interval: &str,
) -> Vec<PatchOp> {
    let assignment =
        Ipv4Assignment::new(uplink.local, uplink.network).with_gateway(uplink.gateway);
    let mut ops = interface.set_addressing(&assignment);
    ops.push(interface.set_probe_interval(probe_interval));
    ops
}

/// Transit interface: its own address, BYOD and guest subinterfaces, then
/// move it to the front and drop its `cellular` block.
///
/// The move comes after every edit addressed by the original index.
pub fn transit_interface(
    interface: &InterfaceRef,
    branch: &BranchSpec,
    probe_interval: &str,
) -> Result<Vec<PatchOp>, CoreError> {
    let own = Ipv4Assignment::new(branch.transit_local()?, branch.transit_net);
    let byod = Ipv4Assignment::new(branch.byod_gateway()?, branch.byod_net);
    let guest = Ipv4Assignment::new(branch.guest_gateway()?, branch.guest_net);

    let mut ops = interface.set_addressing(&own);
    ops.extend(interface.set_subinterface_addressing(BYOD_SUBINTERFACE, &byod));
    ops.extend(interface.set_subinterface_addressing(GUEST_SUBINTERFACE, &guest));
    ops.push(interface.set_probe_interval(probe_interval));
    ops.push(interface.move_to_front());
    ops.push(PatchOp::remove(routed_interface(0).key("cellular")));
    Ok(ops)
}

/// The full `deviceSettings` batch: static routes, VLAN park, first uplink,
/// second uplink, transit interface.
pub fn build_device_settings_batch(
    branch: &BranchSpec,
    device_settings: &Value,
    policy: &ProvisionPolicy,
) -> Result<PatchBatch, CoreError> {
    let view = DeviceSettingsView::new(device_settings);
    let [first_if, second_if] = &policy.uplink_interfaces;
    let first = view.interface(first_if)?;
    let second = view.interface(second_if)?;
    let transit = view.interface(&policy.transit_interface)?;

    let mut batch = PatchBatch::new();
    batch.extend(static_routes(branch, policy)?);
    batch.extend(vlan_park());
    batch.extend(wan_uplink(&first, &branch.wans[0], &policy.probe_interval));
    batch.extend(wan_uplink(&second, &branch.wans[1], &policy.probe_interval));
    batch.extend(transit_interface(&transit, branch, &policy.probe_interval)?);
    Ok(batch)
}
