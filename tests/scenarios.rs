//! End-to-end conformance scenarios.
//!
//! Each test drives the verifier against a reference model configured to
//! behave like a real BMI component of a given protocol version.

use bmi_tester::{
    Bmi, BmiError, BufferOracle, CheckKind, CheckStatus, ConformanceError, ConformanceSuite,
    ConformanceWarning, ContractViolation, ExchangeVerifier, HarnessConfig, Location,
    ModelCapabilities, NumericKind, ProtocolVersion, ReferenceBehavior, ReferenceModel,
    ResolvedLocation, Sentinel, SetValueReturn, ValueBuffer, ValueType,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Grid 0: 10 nodes, 6 edges, 3 faces.
fn hydrology_model() -> ReferenceModel {
    ReferenceModel::new("hydrology")
        .with_grid(0, 10, 6, 3)
        .with_input("precip", "float64", 0, "node")
        .with_output("head", "int32", 0, "edge")
        .with_exchange("storage", "uint16", 0, "node")
        .with_output("level", "float64", 0, "node")
        .with_output("cell_area", "float32", 0, "face")
}

fn legacy_model() -> ReferenceModel {
    hydrology_model().with_behavior(ReferenceBehavior {
        capabilities: ModelCapabilities::legacy(),
        set_value_returns: SetValueReturn::Nothing,
        ..Default::default()
    })
}

/// A BMI 1.0 model with every variable on nodes.
fn legacy_node_model() -> ReferenceModel {
    ReferenceModel::new("legacy")
        .with_grid(0, 10, 6, 3)
        .with_input("precip", "float64", 0, "node")
        .with_output("head", "int32", 0, "node")
        .with_behavior(ReferenceBehavior {
            capabilities: ModelCapabilities::legacy(),
            set_value_returns: SetValueReturn::Nothing,
            ..Default::default()
        })
}

fn broken(behavior: ReferenceBehavior) -> ReferenceModel {
    hydrology_model().with_behavior(behavior)
}

fn violation(err: ConformanceError) -> ContractViolation {
    match err {
        ConformanceError::Violation(v) => v,
        other => panic!("expected a contract violation, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 1: float64 input on nodes, BMI 2.0
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_float_input_on_nodes() {
    let oracle = BufferOracle::for_version(ProtocolVersion::V2_0);
    let model = hydrology_model();

    let descriptor = oracle.describe(&model, "precip").unwrap();
    assert_eq!(descriptor.len, 10);
    assert_eq!(descriptor.value_type, ValueType::F64);
    assert_eq!(descriptor.kind(), NumericKind::Float);
    assert_eq!(descriptor.location, ResolvedLocation::Reported(Location::Node));
    assert!(descriptor.sentinel().is_nan());

    let mut model = hydrology_model();
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V2_0);
    let outcome = verifier.check_set(&mut model, "precip").unwrap();
    assert!(outcome.is_passed());
    assert!(outcome.warnings.is_empty());

    // The model stored the sentinel fill.
    let stored = model.values("precip").and_then(ValueBuffer::as_f64).unwrap();
    assert_eq!(stored.len(), 10);
    assert!(stored.iter().all(|x| x.is_nan()));
}

#[test]
fn test_float_input_fails_on_foreign_buffer() {
    let mut model = broken(ReferenceBehavior {
        set_value_returns: SetValueReturn::Foreign,
        ..Default::default()
    });
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V2_0);

    let err = verifier.check_set(&mut model, "precip").unwrap_err();
    assert_eq!(
        violation(err),
        ContractViolation::IdentityMismatch {
            variable: "precip".to_string(),
            function: "set_value".to_string(),
        }
    );
}

#[test]
fn test_float_input_fails_when_buffer_clobbered() {
    let mut model = broken(ReferenceBehavior {
        clobbers_input: true,
        ..Default::default()
    });
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V2_0);

    let err = verifier.check_set(&mut model, "precip").unwrap_err();
    assert!(matches!(
        violation(err),
        ContractViolation::SentinelNotPreserved { sentinel: Sentinel::Nan, .. }
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 2: int32 output on edges, BMI 1.1
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_int_output_on_edges() {
    let oracle = BufferOracle::for_version(ProtocolVersion::V1_1);
    let model = hydrology_model();

    let descriptor = oracle.describe(&model, "head").unwrap();
    assert_eq!(descriptor.len, 6);
    assert_eq!(descriptor.kind(), NumericKind::SignedInt);
    assert_eq!(descriptor.sentinel(), Sentinel::Signed(-999));
    assert_eq!(descriptor.sentinel_buffer(), ValueBuffer::I32(vec![-999; 6]));

    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_1);
    let outcome = verifier.check_location(&model, "head").unwrap();
    assert!(outcome.is_passed());

    let mut model = hydrology_model();
    let outcome = verifier.check_get(&mut model, "head").unwrap();
    assert!(outcome.is_passed());
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_invalid_location_fails() {
    let model = ReferenceModel::new("bad-location")
        .with_grid(0, 4, 4, 1)
        .with_output("head", "int32", 0, "cell");
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_1);

    let err = verifier.check_location(&model, "head").unwrap_err();
    assert_eq!(
        violation(err),
        ContractViolation::InvalidLocation {
            variable: "head".to_string(),
            value: "cell".to_string(),
        }
    );
}

#[test]
fn test_location_is_case_sensitive() {
    let model = ReferenceModel::new("upper")
        .with_grid(0, 4, 4, 1)
        .with_output("head", "int32", 0, "Edge");
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V2_0);
    assert!(verifier.check_location(&model, "head").is_err());
}

#[test]
fn test_missing_location_capability_fails_from_1_1() {
    let model = legacy_model();
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_1);

    let err = verifier.check_location(&model, "head").unwrap_err();
    assert_eq!(
        violation(err),
        ContractViolation::MissingCapability { function: "get_var_location".to_string() }
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 3: BMI 1.0 model, no location metadata
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_location_skipped_before_1_1() {
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);

    for model in [hydrology_model(), legacy_model()] {
        for name in ["precip", "head", "storage", "level", "cell_area"] {
            let outcome = verifier.check_location(&model, name).unwrap();
            assert!(outcome.is_skipped(), "{name} should be skipped");
            match &outcome.status {
                CheckStatus::Skipped { reason } => assert!(reason.contains("BMIv1.0")),
                other => panic!("unexpected status {other:?}"),
            }
        }
    }
}

#[test]
fn test_pre_1_1_sizes_everything_on_nodes() {
    let oracle = BufferOracle::for_version(ProtocolVersion::V1_0);

    // Even a variable the model places on edges is sized by node count.
    let descriptor = oracle.describe(&hydrology_model(), "head").unwrap();
    assert_eq!(descriptor.len, 10);
    assert_eq!(descriptor.location, ResolvedLocation::AssumedNode);
}

#[test]
fn test_pre_1_1_checks_warn_assuming_nodes() {
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);
    let mut model = hydrology_model();

    let outcome = verifier.check_set(&mut model, "precip").unwrap();
    assert!(outcome.is_passed());
    assert_eq!(
        outcome.warnings,
        vec![ConformanceWarning::AssumingNodes { variable: "precip".to_string() }]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 4: single-argument get_value
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_argument_get_value_falls_back() {
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);

    for name in ["level", "storage"] {
        let mut model = legacy_model();
        let outcome = verifier.check_get(&mut model, name).unwrap();
        assert!(outcome.is_passed(), "{name}: {:?}", outcome.status);
        assert!(outcome
            .warnings
            .contains(&ConformanceWarning::SingleArgumentGetValue { variable: name.to_string() }));
    }
}

#[test]
fn test_single_argument_get_value_without_output_fails() {
    let mut model = hydrology_model().with_behavior(ReferenceBehavior {
        capabilities: ModelCapabilities::legacy(),
        writes_output: false,
        ..Default::default()
    });
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);

    let err = verifier.check_get(&mut model, "storage").unwrap_err();
    assert_eq!(
        violation(err),
        ContractViolation::NoOutputWritten { variable: "storage".to_string() }
    );
}

#[test]
fn test_set_value_returning_nothing_is_tolerated() {
    let mut model = legacy_model();
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);

    let outcome = verifier.check_set(&mut model, "storage").unwrap();
    assert!(outcome.is_passed());
    assert!(outcome
        .warnings
        .contains(&ConformanceWarning::SetValueReturnedNothing { variable: "storage".to_string() }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Output edge cases
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_get_value_into_foreign_buffer_fails() {
    let mut model = broken(ReferenceBehavior {
        returns_foreign_output: true,
        ..Default::default()
    });
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V2_0);

    let err = verifier.check_get(&mut model, "head").unwrap_err();
    assert_eq!(
        violation(err),
        ContractViolation::IdentityMismatch {
            variable: "head".to_string(),
            function: "get_value".to_string(),
        }
    );
}

#[test]
fn test_face_output_gets_empty_buffer_and_fails() {
    // Faces are not sized: the buffer has no element that could change.
    let oracle = BufferOracle::for_version(ProtocolVersion::V2_0);
    assert_eq!(oracle.describe(&hydrology_model(), "cell_area").unwrap().len, 0);

    let mut model = hydrology_model();
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V2_0);
    let err = verifier.check_get(&mut model, "cell_area").unwrap_err();
    assert!(matches!(violation(err), ContractViolation::NoOutputWritten { .. }));
}

#[test]
fn test_model_errors_propagate() {
    let mut model = hydrology_model();
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V2_0);

    let err = verifier.check_set(&mut model, "missing").unwrap_err();
    assert!(matches!(
        err,
        ConformanceError::Model(BmiError::UnknownVariable(ref name)) if name == "missing"
    ));

    let outcome = verifier.run(CheckKind::InputValues, &mut model, "missing");
    assert!(outcome.is_failed());
}

// ─────────────────────────────────────────────────────────────────────────────
// Single-argument get_value result conversion
// ─────────────────────────────────────────────────────────────────────────────

/// BMI 1.0 model with one node variable whose `get_value` hands back
/// whatever buffer it was built with, regardless of the declared type.
struct LegacyGauge {
    declared: &'static str,
    nodes: usize,
    returns: ValueBuffer,
}

impl Bmi for LegacyGauge {
    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::legacy()
    }

    fn get_component_name(&self) -> Result<String, BmiError> {
        Ok("gauge".to_string())
    }

    fn get_input_var_names(&self) -> Result<Vec<String>, BmiError> {
        Ok(Vec::new())
    }

    fn get_output_var_names(&self) -> Result<Vec<String>, BmiError> {
        Ok(vec!["stage".to_string()])
    }

    fn get_var_grid(&self, _name: &str) -> Result<i32, BmiError> {
        Ok(0)
    }

    fn get_var_type(&self, _name: &str) -> Result<String, BmiError> {
        Ok(self.declared.to_string())
    }

    fn get_grid_size(&self, _grid: i32) -> Result<usize, BmiError> {
        Ok(self.nodes)
    }

    fn get_grid_number_of_edges(&self, _grid: i32) -> Result<usize, BmiError> {
        Ok(0)
    }

    fn set_value<'a>(
        &'a mut self,
        _name: &str,
        _src: &'a mut ValueBuffer,
    ) -> Result<Option<&'a ValueBuffer>, BmiError> {
        Ok(None)
    }

    fn get_value(&mut self, _name: &str) -> Result<ValueBuffer, BmiError> {
        Ok(self.returns.clone())
    }
}

#[test]
fn test_single_argument_result_is_converted_to_declared_type() {
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);

    let mut model = LegacyGauge {
        declared: "float32",
        nodes: 3,
        returns: ValueBuffer::F64(vec![1.0, 2.0, 3.0]),
    };
    let outcome = verifier.check_get(&mut model, "stage").unwrap();
    assert!(outcome.is_passed());
    assert!(outcome
        .warnings
        .contains(&ConformanceWarning::SingleArgumentGetValue { variable: "stage".to_string() }));

    let mut model = LegacyGauge {
        declared: "int16",
        nodes: 2,
        returns: ValueBuffer::I64(vec![12, 40]),
    };
    assert!(verifier.check_get(&mut model, "stage").unwrap().is_passed());
}

#[test]
fn test_single_argument_result_converted_to_sentinel_still_fails() {
    // Float NaN converts to integer 0, the unsigned sentinel.
    let mut model = LegacyGauge {
        declared: "uint32",
        nodes: 2,
        returns: ValueBuffer::F64(vec![f64::NAN, 0.0]),
    };
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);

    let err = verifier.check_get(&mut model, "stage").unwrap_err();
    assert!(matches!(violation(err), ContractViolation::NoOutputWritten { .. }));
}

#[test]
fn test_single_argument_result_of_wrong_length_fails() {
    let mut model = LegacyGauge {
        declared: "float32",
        nodes: 3,
        returns: ValueBuffer::F64(vec![1.0, 2.0]),
    };
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);

    let err = verifier.check_get(&mut model, "stage").unwrap_err();
    match violation(err) {
        ContractViolation::IncompatibleBuffer { variable, reason } => {
            assert_eq!(variable, "stage");
            assert!(reason.contains("length"), "{reason}");
        }
        other => panic!("unexpected violation {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Suite
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_suite_on_conforming_model() {
    let suite = ConformanceSuite::new(&HarnessConfig::new(ProtocolVersion::V2_0));
    let report = suite.run(|| {
        ReferenceModel::new("conforming")
            .with_grid(0, 10, 6, 3)
            .with_input("precip", "float64", 0, "node")
            .with_output("head", "int32", 0, "edge")
            .with_exchange("storage", "uint16", 0, "node")
    })
    .unwrap();

    assert!(report.all_passed());
    assert_eq!(report.failed(), 0);
    assert_eq!(report.warnings().count(), 0);
}

#[test]
fn test_suite_on_legacy_model_strict_and_lenient() {
    let lenient = ConformanceSuite::new(&HarnessConfig::new(ProtocolVersion::V1_0));
    let report = lenient.run(legacy_node_model).unwrap();

    assert_eq!(report.skipped(), 2);
    assert_eq!(report.failed(), 0);
    assert!(report.warnings().count() > 0);
    assert!(report.all_passed());

    let strict = ConformanceSuite::new(&HarnessConfig::new(ProtocolVersion::V1_0).strict(true));
    let report = strict.run(legacy_node_model).unwrap();
    assert_eq!(report.failed(), 0);
    assert!(!report.all_passed());
}

#[test]
fn test_suite_report_serializes() {
    let suite = ConformanceSuite::new(&HarnessConfig::default());
    let report = suite.run(hydrology_model).unwrap();
    let json = report.to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["component"], "hydrology");
    assert_eq!(
        value["outcomes"].as_array().map(Vec::len),
        Some(report.outcomes.len())
    );
}
