//! Check outcomes and suite reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ConformanceError, ConformanceWarning, ContractViolation, ProtocolVersion};

/// Which conformance check produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// `get_var_location` metadata check.
    VarLocation,
    /// `set_value` on an input variable.
    InputValues,
    /// `get_value` on an output variable.
    OutputValues,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarLocation => write!(f, "get_var_location"),
            Self::InputValues => write!(f, "get_input_values"),
            Self::OutputValues => write!(f, "get_output_values"),
        }
    }
}

/// Final status of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Every assertion held.
    Passed,
    /// Not applicable to the protocol version under test.
    Skipped {
        /// Why the check does not apply.
        reason: String,
    },
    /// An assertion failed or a model call errored.
    Failed {
        /// Human-readable failure.
        reason: String,
        /// The contract violation, when the failure is one.
        violation: Option<ContractViolation>,
    },
}

impl CheckStatus {
    /// Status for a failed check.
    pub fn failed(err: &ConformanceError) -> Self {
        Self::Failed {
            reason: err.to_string(),
            violation: err.violation().cloned(),
        }
    }
}

/// Outcome of one check against one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// The check.
    pub check: CheckKind,
    /// Variable under test.
    pub variable: String,
    /// Final status.
    pub status: CheckStatus,
    /// Tolerated deviations observed during the check.
    pub warnings: Vec<ConformanceWarning>,
}

impl CheckOutcome {
    /// A passed outcome.
    pub fn passed(check: CheckKind, variable: &str, warnings: Vec<ConformanceWarning>) -> Self {
        Self {
            check,
            variable: variable.to_string(),
            status: CheckStatus::Passed,
            warnings,
        }
    }

    /// A skipped outcome.
    pub fn skipped(check: CheckKind, variable: &str, reason: impl Into<String>) -> Self {
        Self {
            check,
            variable: variable.to_string(),
            status: CheckStatus::Skipped { reason: reason.into() },
            warnings: Vec::new(),
        }
    }

    /// Whether the check passed.
    pub fn is_passed(&self) -> bool {
        matches!(self.status, CheckStatus::Passed)
    }

    /// Whether the check was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, CheckStatus::Skipped { .. })
    }

    /// Whether the check failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, CheckStatus::Failed { .. })
    }
}

/// Outcomes of a full conformance run against one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Component name reported by the model.
    pub component: String,
    /// Protocol version tested.
    pub version: ProtocolVersion,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Whether warnings count as failures.
    pub strict: bool,
    /// Outcomes in execution order.
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    /// Create an empty report.
    pub fn new(component: impl Into<String>, version: ProtocolVersion, strict: bool) -> Self {
        Self {
            component: component.into(),
            version,
            started_at: Utc::now(),
            strict,
            outcomes: Vec::new(),
        }
    }

    /// Number of passed checks.
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_passed()).count()
    }

    /// Number of skipped checks.
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// Number of failed checks.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// All warnings, in order.
    pub fn warnings(&self) -> impl Iterator<Item = &ConformanceWarning> {
        self.outcomes.iter().flat_map(|o| o.warnings.iter())
    }

    /// Whether the run passed: no failures, and no warnings in strict mode.
    pub fn all_passed(&self) -> bool {
        self.failed() == 0 && (!self.strict || self.warnings().next().is_none())
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
