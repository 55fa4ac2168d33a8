//! Contract violations, tolerated deviations, and the harness error type.
//!
//! | Outcome | Type | Effect |
//! |---------|------|--------|
//! | Contract violation | [`ContractViolation`] | Check fails |
//! | Model error | [`BmiError`] | Check fails, not recovered |
//! | Deprecated convention | [`ConformanceWarning`] | Logged and recorded, check continues |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::BmiError;
use super::buffer::BufferError;
use super::numeric::{Sentinel, TypeError};

/// A model behavior that breaks the BMI contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContractViolation {
    /// The protocol version requires a function the model does not declare.
    MissingCapability {
        /// Name of the missing function.
        function: String,
    },
    /// `get_var_location` returned something other than node/edge/face.
    InvalidLocation {
        /// Variable name.
        variable: String,
        /// Value the model returned.
        value: String,
    },
    /// A value call returned a buffer other than the one passed in.
    IdentityMismatch {
        /// Variable name.
        variable: String,
        /// The offending call.
        function: String,
    },
    /// The sentinel fill did not survive `set_value`.
    SentinelNotPreserved {
        /// Variable name.
        variable: String,
        /// Sentinel that was written.
        sentinel: Sentinel,
    },
    /// `get_value` left the sentinel fill untouched.
    NoOutputWritten {
        /// Variable name.
        variable: String,
    },
    /// A single-argument `get_value` result does not fit the expected buffer.
    IncompatibleBuffer {
        /// Variable name.
        variable: String,
        /// Why the copy was rejected.
        reason: String,
    },
}

impl ContractViolation {
    /// Variable the violation was observed on, if any.
    pub fn variable(&self) -> Option<&str> {
        match self {
            Self::MissingCapability { .. } => None,
            Self::InvalidLocation { variable, .. }
            | Self::IdentityMismatch { variable, .. }
            | Self::SentinelNotPreserved { variable, .. }
            | Self::NoOutputWritten { variable }
            | Self::IncompatibleBuffer { variable, .. } => Some(variable),
        }
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCapability { function } => {
                write!(f, "Model does not implement {}", function)
            }
            Self::InvalidLocation { variable, value } => {
                write!(f, "{}: location {:?} is not one of node, edge, face", variable, value)
            }
            Self::IdentityMismatch { variable, function } => {
                write!(f, "{}: {} returned a different buffer than the one passed in", variable, function)
            }
            Self::SentinelNotPreserved { variable, sentinel } => {
                write!(f, "{}: buffer no longer filled with {} after set_value", variable, sentinel)
            }
            Self::NoOutputWritten { variable } => {
                write!(f, "{}: get_value did not change any element of the buffer", variable)
            }
            Self::IncompatibleBuffer { variable, reason } => {
                write!(f, "{}: get_value result does not fit the buffer: {}", variable, reason)
            }
        }
    }
}

/// A deprecated but tolerated model behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConformanceWarning {
    /// Location unavailable; the variable is sized as if on nodes.
    AssumingNodes {
        /// Variable name.
        variable: String,
    },
    /// `set_value` returned nothing.
    SetValueReturnedNothing {
        /// Variable name.
        variable: String,
    },
    /// `get_value` only supports the single-argument form.
    SingleArgumentGetValue {
        /// Variable name.
        variable: String,
    },
}

impl ConformanceWarning {
    /// Variable the warning was raised for.
    pub fn variable(&self) -> &str {
        match self {
            Self::AssumingNodes { variable }
            | Self::SetValueReturnedNothing { variable }
            | Self::SingleArgumentGetValue { variable } => variable,
        }
    }
}

impl fmt::Display for ConformanceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssumingNodes { .. } => {
                write!(f, "get_var_location not implemented (assuming nodes)")
            }
            Self::SetValueReturnedNothing { .. } => write!(f, "set_value should return the buffer"),
            Self::SingleArgumentGetValue { .. } => write!(f, "get_value should take two arguments"),
        }
    }
}

/// Error type for a single conformance check.
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    /// The model broke the contract.
    #[error("Contract violation: {0}")]
    Violation(ContractViolation),

    /// A model call failed.
    #[error("Model call failed: {0}")]
    Model(#[from] BmiError),

    /// The model declared a type the harness cannot allocate.
    #[error("Cannot allocate buffer: {0}")]
    Type(#[from] TypeError),
}

impl From<ContractViolation> for ConformanceError {
    fn from(v: ContractViolation) -> Self {
        Self::Violation(v)
    }
}

impl ConformanceError {
    /// The violation, if this error is one.
    pub fn violation(&self) -> Option<&ContractViolation> {
        match self {
            Self::Violation(v) => Some(v),
            _ => None,
        }
    }

    /// Build an [`ContractViolation::IncompatibleBuffer`] from a copy failure.
    pub fn incompatible(variable: &str, err: BufferError) -> Self {
        Self::Violation(ContractViolation::IncompatibleBuffer {
            variable: variable.to_string(),
            reason: err.to_string(),
        })
    }
}
