//! Buffer oracle.
//!
//! Derives the expected exchange buffer for a variable from the model's own
//! metadata. This is the single place that decides how a variable is sized,
//! including the fallback to nodes when the location cannot be queried.

use tracing::{debug, warn};

use crate::model::Bmi;
use crate::policy::{Capability, VersionPolicy};
use crate::types::{
    ConformanceError, Location, ProtocolVersion, ResolvedLocation, ValueType, VarDescriptor,
};

/// Computes [`VarDescriptor`]s for a fixed protocol version.
///
/// ## Algorithm
///
/// 1. `get_var_grid(name)`
/// 2. `get_var_location(name)` when both the version and the model support
///    it; otherwise assume `node` and warn
/// 3. size by location: nodes → `get_grid_size`, edges →
///    `get_grid_number_of_edges`, anything else → 0
/// 4. `get_var_type(name)` resolved to a [`ValueType`]
///
/// Model errors propagate unchanged. Each model function is called at most
/// once per `describe`.
#[derive(Debug, Clone)]
pub struct BufferOracle {
    policy: VersionPolicy,
}

impl BufferOracle {
    /// Create an oracle from a resolved policy.
    pub fn new(policy: VersionPolicy) -> Self {
        Self { policy }
    }

    /// Create an oracle for `version` using the default capability table.
    pub fn for_version(version: ProtocolVersion) -> Self {
        Self::new(VersionPolicy::for_version(version))
    }

    /// The policy this oracle applies.
    pub fn policy(&self) -> &VersionPolicy {
        &self.policy
    }

    /// Describe the exchange buffer for `name`.
    pub fn describe<M: Bmi + ?Sized>(
        &self,
        model: &M,
        name: &str,
    ) -> Result<VarDescriptor, ConformanceError> {
        let grid = model.get_var_grid(name)?;
        let location = self.resolve_location(model, name)?;

        let len = match location.effective() {
            Some(Location::Node) => model.get_grid_size(grid)?,
            Some(Location::Edge) => model.get_grid_number_of_edges(grid)?,
            Some(Location::Face) | None => 0,
        };

        let value_type = ValueType::parse(&model.get_var_type(name)?)?;

        debug!(
            variable = name,
            grid,
            location = %location,
            value_type = %value_type,
            len,
            "Resolved exchange buffer"
        );

        Ok(VarDescriptor {
            name: name.to_string(),
            grid,
            location,
            value_type,
            len,
        })
    }

    fn resolve_location<M: Bmi + ?Sized>(
        &self,
        model: &M,
        name: &str,
    ) -> Result<ResolvedLocation, ConformanceError> {
        if !self.policy.allows(Capability::VarLocation) || !model.capabilities().var_location {
            warn!(
                variable = name,
                version = %self.policy.version(),
                "get_var_location not implemented (assuming nodes)"
            );
            return Ok(ResolvedLocation::AssumedNode);
        }

        let raw = model.get_var_location(name)?;
        Ok(match Location::parse(&raw) {
            Some(loc) => ResolvedLocation::Reported(loc),
            None => ResolvedLocation::Unrecognized(raw),
        })
    }
}
