//! Derived description of one exchange item.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::buffer::ValueBuffer;
use super::location::Location;
use super::numeric::{NumericKind, Sentinel, ValueType};

/// Where a variable's values live, as far as the harness could tell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "location", rename_all = "snake_case")]
pub enum ResolvedLocation {
    /// Reported by `get_var_location`.
    Reported(Location),
    /// Not queried (unavailable for the version or the model); nodes assumed.
    AssumedNode,
    /// `get_var_location` returned something outside node/edge/face.
    Unrecognized(String),
}

impl ResolvedLocation {
    /// The location used for sizing, if any.
    pub fn effective(&self) -> Option<Location> {
        match self {
            Self::Reported(loc) => Some(*loc),
            Self::AssumedNode => Some(Location::Node),
            Self::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reported(loc) => write!(f, "{}", loc),
            Self::AssumedNode => write!(f, "node (assumed)"),
            Self::Unrecognized(raw) => write!(f, "{:?} (unrecognized)", raw),
        }
    }
}

/// Expected shape and type of a variable's exchange buffer.
///
/// Recomputed for every check from the model's own metadata; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarDescriptor {
    /// Variable name.
    pub name: String,
    /// Grid identifier.
    pub grid: i32,
    /// Grid location.
    pub location: ResolvedLocation,
    /// Element type.
    pub value_type: ValueType,
    /// Number of elements.
    pub len: usize,
}

impl VarDescriptor {
    /// Numeric kind of the element type.
    pub fn kind(&self) -> NumericKind {
        self.value_type.kind()
    }

    /// Sentinel for the element type.
    pub fn sentinel(&self) -> Sentinel {
        self.value_type.sentinel()
    }

    /// Allocate a zeroed buffer of the described type and length.
    pub fn empty_buffer(&self) -> ValueBuffer {
        ValueBuffer::empty(self.value_type, self.len)
    }

    /// Allocate a buffer filled with the sentinel.
    pub fn sentinel_buffer(&self) -> ValueBuffer {
        let mut buf = self.empty_buffer();
        buf.fill(self.sentinel());
        buf
    }
}
