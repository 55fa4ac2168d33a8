//! Version policy definitions.

pub mod capability;

pub use capability::{Capability, CapabilityTable, VersionPolicy, VersionRange};
