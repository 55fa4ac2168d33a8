//! # bmi-tester
//!
//! Conformance harness for Basic Model Interface (BMI) implementations.
//!
//! The harness answers one question:
//!
//! > Does this model exchange values the way the BMI contract for its declared
//! > protocol version requires?
//!
//! ## Core Contract
//!
//! 1. Size and type an exchange buffer from the model's own metadata (grid,
//!    location, grid size, variable type)
//! 2. Fill it with a sentinel and drive `set_value` / `get_value`
//! 3. Assert buffer identity, sentinel preservation on input, and observable
//!    output on get
//!
//! ## Architecture
//!
//! ```text
//! ConformanceSuite → ExchangeVerifier → BufferOracle → Bmi (metadata)
//!                          ↓
//!                    Bmi (set_value / get_value) → CheckOutcome
//! ```
//!
//! ## Version Handling
//!
//! Version differences are resolved once, from a [`CapabilityTable`], into a
//! [`VersionPolicy`]. Before BMI 1.1 there is no `get_var_location`: the
//! location check is skipped and every variable is sized as if on nodes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod model;
pub mod policy;
pub mod oracle;
pub mod verifier;
pub mod report;
pub mod suite;
pub mod config;

// Re-exports
pub use types::{
    ProtocolVersion, VersionError, Location, NumericKind, Sentinel, TypeError, ValueType,
    BufferError, ValueBuffer, VarDescriptor, ResolvedLocation,
    ContractViolation, ConformanceWarning, ConformanceError,
};
pub use model::{
    Bmi, BmiError, GetValueConvention, ModelCapabilities,
    ReferenceModel, ReferenceBehavior, SetValueReturn,
};
pub use policy::{Capability, CapabilityTable, VersionPolicy, VersionRange};
pub use oracle::BufferOracle;
pub use verifier::ExchangeVerifier;
pub use report::{CheckKind, CheckOutcome, CheckStatus, SuiteReport};
pub use suite::{ConformanceSuite, strictly_input_names};
pub use config::{HarnessConfig, DEFAULT_BMI_VERSION};
