//! Harness configuration.
//!
//! ## Environment
//!
//! - `BMI_VERSION_STRING`: protocol version under test (default: `2.0`)
//! - `BMI_TESTER_STRICT`: `1`/`true` makes warnings fail the suite (default: off)
//!
//! The process-wide configuration is read once, on first use of
//! [`HarnessConfig::global`], and never changes afterwards.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::policy::VersionPolicy;
use crate::types::{ProtocolVersion, VersionError};

/// Environment variable holding the protocol version.
pub const VERSION_ENV: &str = "BMI_VERSION_STRING";

/// Environment variable enabling strict mode.
pub const STRICT_ENV: &str = "BMI_TESTER_STRICT";

/// Version tested when `BMI_VERSION_STRING` is unset.
pub const DEFAULT_BMI_VERSION: &str = "2.0";

/// Configuration for a conformance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Protocol version under test.
    pub version: ProtocolVersion,
    /// Whether tolerated deviations fail the suite.
    pub strict: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new(ProtocolVersion::V2_0)
    }
}

impl HarnessConfig {
    /// Configuration for `version`, non-strict.
    pub fn new(version: ProtocolVersion) -> Self {
        Self { version, strict: false }
    }

    /// Enable or disable strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build from explicit variable values (`None` = unset).
    pub fn from_vars(version: Option<&str>, strict: Option<&str>) -> Result<Self, VersionError> {
        let version = ProtocolVersion::parse(version.unwrap_or(DEFAULT_BMI_VERSION))?;
        let strict = strict
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);
        Ok(Self { version, strict })
    }

    /// Read from the process environment.
    pub fn from_env() -> Result<Self, VersionError> {
        let version = std::env::var(VERSION_ENV).ok();
        let strict = std::env::var(STRICT_ENV).ok();
        Self::from_vars(version.as_deref(), strict.as_deref())
    }

    /// The process-wide configuration, loaded from the environment once.
    ///
    /// Fails every time if the environment holds an invalid version.
    pub fn global() -> Result<&'static HarnessConfig, VersionError> {
        static GLOBAL: OnceLock<Result<HarnessConfig, VersionError>> = OnceLock::new();
        GLOBAL.get_or_init(Self::from_env).as_ref().map_err(Clone::clone)
    }

    /// Resolve the capability policy for the configured version.
    pub fn policy(&self) -> VersionPolicy {
        VersionPolicy::for_version(self.version)
    }
}
