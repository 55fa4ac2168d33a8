//! Core types for the conformance harness.

pub mod version;
pub mod location;
pub mod numeric;
pub mod buffer;
pub mod descriptor;
pub mod violation;

pub use version::{ProtocolVersion, VersionError};
pub use location::Location;
pub use numeric::{NumericKind, Sentinel, TypeError, ValueType};
pub use buffer::{BufferError, ValueBuffer};
pub use descriptor::{VarDescriptor, ResolvedLocation};
pub use violation::{ContractViolation, ConformanceWarning, ConformanceError};
