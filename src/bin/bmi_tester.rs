//! BMI conformance runner.
//!
//! Runs the value-exchange suite against the built-in reference model and
//! prints the report as JSON on stdout.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `BMI_VERSION_STRING`: protocol version under test (default: 2.0)
//! - `BMI_TESTER_STRICT`: "1" or "true" to fail on warnings (default: off)
//! - `BMI_TESTER_MODEL`: "reference" or "legacy" (default: reference)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! Logs go to stderr so the report on stdout stays machine-readable.
//!
//! ## Usage
//!
//! ```bash
//! BMI_VERSION_STRING=1.0 BMI_TESTER_MODEL=legacy cargo run --bin bmi_tester
//! ```

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bmi_tester::{
    ConformanceSuite, HarnessConfig, ModelCapabilities, ReferenceBehavior, ReferenceModel,
    SetValueReturn,
};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bmi_tester=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Two-grid model with node, edge and face variables of several types.
fn reference_model(legacy: bool) -> ReferenceModel {
    let model = ReferenceModel::new("reference_heat")
        .with_grid(0, 12, 17, 6)
        .with_grid(1, 4, 4, 1)
        .with_input("atmosphere__precipitation_rate", "float64", 0, "node")
        .with_input("land_surface__roughness_class", "uint8", 1, "node")
        .with_exchange("plate_surface__temperature", "float64", 0, "node")
        .with_output("channel__discharge", "float32", 0, "edge")
        .with_output("cell__wet_flag_count", "int32", 1, "edge");

    if legacy {
        model.with_behavior(ReferenceBehavior {
            capabilities: ModelCapabilities::legacy(),
            set_value_returns: SetValueReturn::Nothing,
            ..Default::default()
        })
    } else {
        model
    }
}

fn main() -> ExitCode {
    init_tracing();

    let config = match HarnessConfig::global() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid harness configuration");
            return ExitCode::FAILURE;
        }
    };

    let legacy = std::env::var("BMI_TESTER_MODEL").is_ok_and(|m| m == "legacy");
    info!(
        version = %config.version,
        strict = config.strict,
        legacy,
        "Starting BMI conformance run"
    );

    let suite = ConformanceSuite::new(config);
    let report = match suite.run(|| reference_model(legacy)) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Could not enumerate model variables");
            return ExitCode::FAILURE;
        }
    };

    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!(error = %e, "Failed to serialize report");
            return ExitCode::FAILURE;
        }
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
