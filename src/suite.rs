//! Suite runner.
//!
//! Runs every applicable check against every variable of a component. Each
//! check gets a freshly constructed model, so a failure in one check cannot
//! leak state into the next.

use std::collections::BTreeSet;

use tracing::{info, info_span};

use crate::config::HarnessConfig;
use crate::model::{Bmi, BmiError};
use crate::report::{CheckKind, SuiteReport};
use crate::verifier::ExchangeVerifier;

/// Names of variables a model accepts as input but does not expose as output.
pub fn strictly_input_names<M: Bmi + ?Sized>(model: &M) -> Result<Vec<String>, BmiError> {
    let outputs: BTreeSet<String> = model.get_output_var_names()?.into_iter().collect();
    Ok(model
        .get_input_var_names()?
        .into_iter()
        .filter(|name| !outputs.contains(name))
        .collect())
}

/// Conformance suite for one protocol version.
#[derive(Debug, Clone)]
pub struct ConformanceSuite {
    verifier: ExchangeVerifier,
    strict: bool,
}

impl ConformanceSuite {
    /// Create a suite from a configuration.
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            verifier: ExchangeVerifier::new(config.policy()),
            strict: config.strict,
        }
    }

    /// The verifier used for each check.
    pub fn verifier(&self) -> &ExchangeVerifier {
        &self.verifier
    }

    /// Run all checks.
    ///
    /// `new_bmi` must return a fresh model on every call. Variable names are
    /// read from the first model. Failing checks are recorded in the report;
    /// only a failure to enumerate variables aborts the run.
    ///
    /// Order: `get_var_location` for every variable (sorted, deduplicated),
    /// then `set_value` for every input, then `get_value` for every output.
    pub fn run<M, F>(&self, mut new_bmi: F) -> Result<SuiteReport, BmiError>
    where
        M: Bmi,
        F: FnMut() -> M,
    {
        let probe = new_bmi();
        let component = probe.get_component_name()?;
        let inputs = probe.get_input_var_names()?;
        let outputs = probe.get_output_var_names()?;
        drop(probe);

        let all: BTreeSet<&String> = inputs.iter().chain(outputs.iter()).collect();

        let span = info_span!("conformance", component = %component, version = %self.verifier.version());
        let _guard = span.enter();

        let mut report = SuiteReport::new(&component, self.verifier.version(), self.strict);

        let plan = all
            .into_iter()
            .map(|name| (CheckKind::VarLocation, name))
            .chain(inputs.iter().map(|name| (CheckKind::InputValues, name)))
            .chain(outputs.iter().map(|name| (CheckKind::OutputValues, name)));

        for (check, name) in plan {
            let mut model = new_bmi();
            let outcome = self.verifier.run(check, &mut model, name);
            info!(
                check = %check,
                variable = %name,
                status = ?outcome.status,
                warnings = outcome.warnings.len(),
                "Check finished"
            );
            report.outcomes.push(outcome);
        }

        info!(
            passed = report.passed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Conformance run finished"
        );
        Ok(report)
    }
}
