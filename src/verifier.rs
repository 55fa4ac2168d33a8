//! Exchange verifier.
//!
//! Drives a model's metadata and value-exchange functions and checks the
//! results against the BMI contract for one protocol version.
//!
//! ## Checks
//!
//! | Check | Function | Fails on |
//! |-------|----------|----------|
//! | [`check_location`](ExchangeVerifier::check_location) | `get_var_location` | missing capability, value outside node/edge/face |
//! | [`check_set`](ExchangeVerifier::check_set) | `set_value` | foreign buffer returned, sentinel fill changed |
//! | [`check_get`](ExchangeVerifier::check_get) | `get_value` | foreign buffer returned, sentinel fill unchanged |
//!
//! ## Tolerated Deviations
//!
//! Older models are not failed for conventions that tightened later:
//! `set_value` returning nothing and a single-argument `get_value` each
//! produce a [`ConformanceWarning`], logged through `tracing` and recorded in
//! the outcome. A single-argument `get_value` result is converted into the
//! harness buffer's declared type; only a length mismatch fails.
//!
//! Buffer identity is pointer identity: a model that copies the caller's
//! buffer and returns the copy fails even if the contents match.

use tracing::warn;

use crate::model::{Bmi, GetValueConvention};
use crate::oracle::BufferOracle;
use crate::policy::{Capability, VersionPolicy};
use crate::report::{CheckKind, CheckOutcome, CheckStatus};
use crate::types::{
    ConformanceError, ConformanceWarning, ContractViolation, Location, ProtocolVersion,
    ResolvedLocation, ValueBuffer, VarDescriptor,
};

/// Conformance checks for the value-exchange subset of BMI.
#[derive(Debug, Clone)]
pub struct ExchangeVerifier {
    oracle: BufferOracle,
}

impl ExchangeVerifier {
    /// Create a verifier from a resolved policy.
    pub fn new(policy: VersionPolicy) -> Self {
        Self {
            oracle: BufferOracle::new(policy),
        }
    }

    /// Create a verifier for `version` using the default capability table.
    pub fn for_version(version: ProtocolVersion) -> Self {
        Self::new(VersionPolicy::for_version(version))
    }

    /// The buffer oracle used to size buffers.
    pub fn oracle(&self) -> &BufferOracle {
        &self.oracle
    }

    /// The protocol version under test.
    pub fn version(&self) -> ProtocolVersion {
        self.oracle.policy().version()
    }

    /// Check that `get_var_location` reports node, edge or face.
    ///
    /// Skipped when the version predates `get_var_location`.
    pub fn check_location<M: Bmi + ?Sized>(
        &self,
        model: &M,
        name: &str,
    ) -> Result<CheckOutcome, ConformanceError> {
        if !self.oracle.policy().allows(Capability::VarLocation) {
            return Ok(CheckOutcome::skipped(
                CheckKind::VarLocation,
                name,
                format!(
                    "testing BMIv{}: get_var_location is not part of this version",
                    self.version()
                ),
            ));
        }

        self.location_inner(model, name)?;
        Ok(CheckOutcome::passed(CheckKind::VarLocation, name, Vec::new()))
    }

    /// Check `set_value` on an input variable.
    pub fn check_set<M: Bmi + ?Sized>(
        &self,
        model: &mut M,
        name: &str,
    ) -> Result<CheckOutcome, ConformanceError> {
        let mut warnings = Vec::new();
        self.set_inner(model, name, &mut warnings)?;
        Ok(CheckOutcome::passed(CheckKind::InputValues, name, warnings))
    }

    /// Check `get_value` on an output variable.
    pub fn check_get<M: Bmi + ?Sized>(
        &self,
        model: &mut M,
        name: &str,
    ) -> Result<CheckOutcome, ConformanceError> {
        let mut warnings = Vec::new();
        self.get_inner(model, name, &mut warnings)?;
        Ok(CheckOutcome::passed(CheckKind::OutputValues, name, warnings))
    }

    /// Run one check and fold any error into a failed outcome.
    ///
    /// Warnings raised before a failure are kept.
    pub fn run<M: Bmi + ?Sized>(&self, check: CheckKind, model: &mut M, name: &str) -> CheckOutcome {
        if check == CheckKind::VarLocation {
            return self
                .check_location(model, name)
                .unwrap_or_else(|err| failed(check, name, &err, Vec::new()));
        }

        let mut warnings = Vec::new();
        let result = match check {
            CheckKind::InputValues => self.set_inner(model, name, &mut warnings),
            _ => self.get_inner(model, name, &mut warnings),
        };

        match result {
            Ok(()) => CheckOutcome::passed(check, name, warnings),
            Err(err) => failed(check, name, &err, warnings),
        }
    }

    fn location_inner<M: Bmi + ?Sized>(&self, model: &M, name: &str) -> Result<(), ConformanceError> {
        if !model.capabilities().var_location {
            return Err(ContractViolation::MissingCapability {
                function: Capability::VarLocation.name().to_string(),
            }
            .into());
        }

        let value = model.get_var_location(name)?;
        if Location::parse(&value).is_none() {
            return Err(ContractViolation::InvalidLocation {
                variable: name.to_string(),
                value,
            }
            .into());
        }
        Ok(())
    }

    fn set_inner<M: Bmi + ?Sized>(
        &self,
        model: &mut M,
        name: &str,
        warnings: &mut Vec<ConformanceWarning>,
    ) -> Result<(), ConformanceError> {
        let descriptor = self.describe(model, name, warnings)?;
        let sentinel = descriptor.sentinel();
        let mut values = descriptor.sentinel_buffer();

        let expected: *const ValueBuffer = &values;
        let returned_same = model
            .set_value(name, &mut values)?
            .map(|rtn| std::ptr::eq(rtn, expected));

        match returned_same {
            None => record(
                warnings,
                ConformanceWarning::SetValueReturnedNothing { variable: name.to_string() },
            ),
            Some(false) => {
                return Err(ContractViolation::IdentityMismatch {
                    variable: name.to_string(),
                    function: "set_value".to_string(),
                }
                .into());
            }
            Some(true) => {}
        }

        if !values.is_filled_with(sentinel) {
            return Err(ContractViolation::SentinelNotPreserved {
                variable: name.to_string(),
                sentinel,
            }
            .into());
        }
        Ok(())
    }

    fn get_inner<M: Bmi + ?Sized>(
        &self,
        model: &mut M,
        name: &str,
        warnings: &mut Vec<ConformanceWarning>,
    ) -> Result<(), ConformanceError> {
        let descriptor = self.describe(model, name, warnings)?;
        let mut values = descriptor.sentinel_buffer();
        let initial = values.clone();

        match model.capabilities().get_value {
            GetValueConvention::InPlace => {
                let expected: *const ValueBuffer = &values;
                let rtn = model.get_value_into(name, &mut values)?;
                if !std::ptr::eq(rtn, expected) {
                    return Err(ContractViolation::IdentityMismatch {
                        variable: name.to_string(),
                        function: "get_value".to_string(),
                    }
                    .into());
                }
            }
            GetValueConvention::Returning => {
                record(
                    warnings,
                    ConformanceWarning::SingleArgumentGetValue { variable: name.to_string() },
                );
                let rtn = model.get_value(name)?;
                values
                    .cast_from(&rtn)
                    .map_err(|e| ConformanceError::incompatible(name, e))?;
            }
        }

        if !values.differs_from(&initial) {
            return Err(ContractViolation::NoOutputWritten { variable: name.to_string() }.into());
        }
        Ok(())
    }

    /// Describe through the oracle, recording the node fallback as a warning.
    fn describe<M: Bmi + ?Sized>(
        &self,
        model: &M,
        name: &str,
        warnings: &mut Vec<ConformanceWarning>,
    ) -> Result<VarDescriptor, ConformanceError> {
        let descriptor = self.oracle.describe(model, name)?;
        if descriptor.location == ResolvedLocation::AssumedNode {
            // Already logged by the oracle.
            warnings.push(ConformanceWarning::AssumingNodes { variable: name.to_string() });
        }
        Ok(descriptor)
    }
}

fn record(warnings: &mut Vec<ConformanceWarning>, warning: ConformanceWarning) {
    warn!(variable = warning.variable(), "{}", warning);
    warnings.push(warning);
}

fn failed(
    check: CheckKind,
    name: &str,
    err: &ConformanceError,
    warnings: Vec<ConformanceWarning>,
) -> CheckOutcome {
    CheckOutcome {
        check,
        variable: name.to_string(),
        status: CheckStatus::failed(err),
        warnings,
    }
}
