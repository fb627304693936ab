// ── Typed navigation over `deviceSettings` ──
//
// Interfaces live in `routedInterfaces[]` and are addressed by position,
// but callers know them by name. The view resolves names against one
// snapshot of the document; every `InterfaceRef` it hands out is valid
// only for that snapshot and until a `move` reorders the array.

use serde_json::Value;

use super::builders::Ipv4Assignment;
use super::{PatchOp, Pointer};
use crate::error::CoreError;

const ROUTED_INTERFACES: &str = "routedInterfaces";

/// Read-only view of a `deviceSettings` document.
#[derive(Debug, Clone, Copy)]
pub struct DeviceSettingsView<'a> {
    doc: &'a Value,
}

impl<'a> DeviceSettingsView<'a> {
    pub fn new(doc: &'a Value) -> Self {
        Self { doc }
    }

    fn routed_interfaces(&self) -> &'a [Value] {
        self.doc
            .get(ROUTED_INTERFACES)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Interface names in document order. Entries without a name are skipped.
    pub fn interface_names(&self) -> Vec<&'a str> {
        self.routed_interfaces()
            .iter()
            .filter_map(|i| i.get("name").and_then(Value::as_str))
            .collect()
    }

    /// Resolve an interface by name to its current position.
    pub fn interface(&self, name: &str) -> Result<InterfaceRef, CoreError> {
        self.routed_interfaces()
            .iter()
            .position(|i| i.get("name").and_then(Value::as_str) == Some(name))
            .map(|index| InterfaceRef {
                name: name.to_owned(),
                index,
            })
            .ok_or_else(|| CoreError::InterfaceNotFound {
                name: name.to_owned(),
            })
    }
}

/// A routed interface pinned to its index in one document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRef {
    name: String,
    index: usize,
}

impl InterfaceRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// `/routedInterfaces/{index}`
    pub fn pointer(&self) -> Pointer {
        routed_interface(self.index)
    }

    /// Write interface addressing (`cidrIp`, `cidrPrefix`, `netmask`, optional `gateway`).
    pub fn set_addressing(&self, assignment: &Ipv4Assignment) -> Vec<PatchOp> {
        assignment.ops(self.pointer().key("addressing"))
    }

    /// Write addressing on the subinterface at `sub`.
    pub fn set_subinterface_addressing(
        &self,
        sub: usize,
        assignment: &Ipv4Assignment,
    ) -> Vec<PatchOp> {
        assignment.ops(
            self.pointer()
                .key("subinterfaces")
                .index(sub)
                .key("addressing"),
        )
    }

    /// Replace the link-probe interval. The key must already exist.
    pub fn set_probe_interval(&self, interval: &str) -> PatchOp {
        PatchOp::replace(self.pointer().key("l2").key("probeInterval"), interval)
    }

    /// Move this interface to the front of `routedInterfaces`.
    ///
    /// Every other `InterfaceRef` taken from the same snapshot is stale
    /// once this runs.
    pub fn move_to_front(&self) -> PatchOp {
        PatchOp::move_to(self.pointer(), routed_interface(0))
    }
}

/// `/routedInterfaces/{index}`
pub fn routed_interface(index: usize) -> Pointer {
    Pointer::root().key(ROUTED_INTERFACES).index(index)
}
