// ── Structural edits to module documents ──
//
// Edits are built as typed `PatchOp`s addressed by `Pointer`s and only
// become RFC 6902 JSON when a batch is serialized or applied. A batch is
// applied all-or-nothing.

pub mod builders;
pub mod view;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

pub use builders::{
    Ipv4Assignment, build_device_settings_batch, static_routes, transit_interface, vlan_park,
    wan_uplink,
};
pub use view::{DeviceSettingsView, InterfaceRef};

// ── Pointer ─────────────────────────────────────────────────────────

/// An RFC 6901 JSON pointer built segment by segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pointer(String);

impl Pointer {
    /// The whole document (`""`).
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Descend into an object member. `~` and `/` are escaped.
    #[must_use]
    pub fn key(mut self, key: &str) -> Self {
        self.0.push('/');
        self.0.push_str(&key.replace('~', "~0").replace('/', "~1"));
        self
    }

    /// Descend into an array element.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.0.push('/');
        self.0.push_str(&index.to_string());
        self
    }

    /// The position after the last array element (`-`), valid only as an `add` target.
    #[must_use]
    pub fn append(mut self) -> Self {
        self.0.push_str("/-");
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Operations ──────────────────────────────────────────────────────

/// A single RFC 6902 operation.
///
/// Only the operations the pipelines emit are modeled. The serde form is
/// the wire form: `{"op": "add", "path": "/a", "value": 1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: Pointer, value: Value },
    Remove { path: Pointer },
    Replace { path: Pointer, value: Value },
    Move { from: Pointer, path: Pointer },
}

impl PatchOp {
    pub fn add(path: Pointer, value: impl Into<Value>) -> Self {
        Self::Add {
            path,
            value: value.into(),
        }
    }

    pub fn remove(path: Pointer) -> Self {
        Self::Remove { path }
    }

    pub fn replace(path: Pointer, value: impl Into<Value>) -> Self {
        Self::Replace {
            path,
            value: value.into(),
        }
    }

    pub fn move_to(from: Pointer, path: Pointer) -> Self {
        Self::Move { from, path }
    }

    /// Target path of the operation.
    pub fn path(&self) -> &Pointer {
        match self {
            Self::Add { path, .. }
            | Self::Remove { path }
            | Self::Replace { path, .. }
            | Self::Move { path, .. } => path,
        }
    }
}

// ── Batch ───────────────────────────────────────────────────────────

/// An ordered list of operations applied as one unit.
///
/// Order matters: later operations see the effects of earlier ones, so an
/// index captured before a `move` is only valid up to that `move`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchBatch {
    ops: Vec<PatchOp>,
}

impl PatchBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: PatchOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// RFC 6902 JSON array.
    pub fn to_json(&self) -> Result<Value, CoreError> {
        serde_json::to_value(&self.ops).map_err(CoreError::patch)
    }

    /// Apply every operation to `doc`, or none of them.
    ///
    /// On failure `doc` is left exactly as it was.
    pub fn apply(&self, doc: &mut Value) -> Result<(), CoreError> {
        let ops: Vec<json_patch::PatchOperation> =
            serde_json::from_value(self.to_json()?).map_err(CoreError::patch)?;

        let mut working = doc.clone();
        json_patch::patch(&mut working, &ops).map_err(CoreError::patch)?;
        *doc = working;
        Ok(())
    }

    /// Apply to a copy of `doc` and return the result.
    pub fn applied_to(&self, doc: &Value) -> Result<Value, CoreError> {
        let mut out = doc.clone();
        self.apply(&mut out)?;
        Ok(out)
    }
}

impl Extend<PatchOp> for PatchBatch {
    fn extend<I: IntoIterator<Item = PatchOp>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

impl FromIterator<PatchOp> for PatchBatch {
    fn from_iter<I: IntoIterator<Item = PatchOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PatchBatch {
    type Item = PatchOp;
    type IntoIter = std::vec::IntoIter<PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
