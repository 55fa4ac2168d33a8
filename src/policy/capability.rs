//! Version-gated protocol capabilities.
//!
//! Every feature that appeared (or disappeared) in a later BMI release is an
//! entry in a [`CapabilityTable`]. The table is resolved once against the
//! version under test into a [`VersionPolicy`]; checks consult the policy and
//! never compare versions themselves.
//!
//! | Capability | Introduced | Removed |
//! |------------|-----------|---------|
//! | `VarLocation` | 1.1 | - |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::ProtocolVersion;

/// A protocol feature whose presence depends on the version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// `get_var_location`, and with it variables that live on edges or faces.
    VarLocation,
}

impl Capability {
    /// Name of the BMI function or concept behind this capability.
    pub fn name(&self) -> &'static str {
        match self {
            Self::VarLocation => "get_var_location",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Version window in which a capability is part of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    /// First version that has the capability.
    pub introduced: ProtocolVersion,
    /// First version that no longer has it.
    pub removed: Option<ProtocolVersion>,
}

impl VersionRange {
    /// Whether `version` falls inside this window.
    pub fn contains(&self, version: ProtocolVersion) -> bool {
        version >= self.introduced && !matches!(self.removed, Some(removed) if version >= removed)
    }
}

/// Mapping from capability to the versions that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityTable {
    entries: BTreeMap<Capability, VersionRange>,
}

impl Default for CapabilityTable {
    /// The BMI release history.
    fn default() -> Self {
        Self::new().with(Capability::VarLocation, ProtocolVersion::V1_1)
    }
}

impl CapabilityTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add a capability introduced in `introduced` and never removed.
    pub fn with(mut self, capability: Capability, introduced: ProtocolVersion) -> Self {
        self.entries.insert(capability, VersionRange { introduced, removed: None });
        self
    }

    /// Add a capability with an explicit window.
    pub fn with_range(mut self, capability: Capability, range: VersionRange) -> Self {
        self.entries.insert(capability, range);
        self
    }

    /// Resolve every entry against `version`.
    pub fn resolve(&self, version: ProtocolVersion) -> VersionPolicy {
        let available = self
            .entries
            .iter()
            .map(|(&cap, range)| (cap, range.contains(version)))
            .collect();
        VersionPolicy { version, available }
    }
}

/// Capabilities of one protocol version, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPolicy {
    version: ProtocolVersion,
    available: BTreeMap<Capability, bool>,
}

impl VersionPolicy {
    /// Resolve the default table for `version`.
    pub fn for_version(version: ProtocolVersion) -> Self {
        CapabilityTable::default().resolve(version)
    }

    /// The version this policy was resolved for.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Whether the protocol version includes `capability`.
    ///
    /// Capabilities missing from the table are treated as always present.
    pub fn allows(&self, capability: Capability) -> bool {
        self.available.get(&capability).copied().unwrap_or(true)
    }
}
