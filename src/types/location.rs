//! Grid locations a variable's values can live on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topological tier of a grid that a variable is defined on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Grid nodes (points).
    Node,
    /// Grid edges.
    Edge,
    /// Grid faces.
    Face,
}

impl Location {
    /// All locations a conforming model may report.
    pub const ALL: [Self; 3] = [Self::Node, Self::Edge, Self::Face];

    /// Parse a location exactly as reported by a model.
    ///
    /// Matching is case-sensitive: `"Node"` is not a valid BMI location.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "node" => Some(Self::Node),
            "edge" => Some(Self::Edge),
            "face" => Some(Self::Face),
            _ => None,
        }
    }

    /// The wire name of this location.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Face => "face",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
