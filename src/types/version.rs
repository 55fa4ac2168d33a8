//! Protocol version of the Basic Model Interface under test.
//!
//! Versions are compared as `(major, minor, patch)` tuples. Parsing accepts
//! `MAJOR.MINOR` and `MAJOR.MINOR.PATCH`; a missing patch component is `0`,
//! so `"1.1"` and `"1.1.0"` are the same version.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Error type for version parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// The string is not `MAJOR.MINOR[.PATCH]`.
    #[error("Invalid BMI version string: {0:?}")]
    Malformed(String),

    /// A component does not fit in a `u32`.
    #[error("BMI version component out of range in {0:?}")]
    OutOfRange(String),
}

/// A BMI protocol version.
///
/// Field order matters: the derived `Ord` compares major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProtocolVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").expect("Version pattern is valid")
    })
}

impl ProtocolVersion {
    /// BMI 1.0, the first release. No `get_var_location`.
    pub const V1_0: Self = Self::new(1, 0, 0);
    /// BMI 1.1, which introduced `get_var_location`.
    pub const V1_1: Self = Self::new(1, 1, 0);
    /// BMI 2.0.
    pub const V2_0: Self = Self::new(2, 0, 0);

    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse a version string such as `"1.1"` or `"2.0.1"`.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let trimmed = s.trim();
        let caps = version_pattern()
            .captures(trimmed)
            .ok_or_else(|| VersionError::Malformed(s.to_string()))?;

        let component = |idx: usize| -> Result<u32, VersionError> {
            match caps.get(idx) {
                Some(m) => m
                    .as_str()
                    .parse::<u32>()
                    .map_err(|_| VersionError::OutOfRange(s.to_string())),
                None => Ok(0),
            }
        };

        Ok(Self::new(component(1)?, component(2)?, component(3)?))
    }
}

impl FromStr for ProtocolVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}
