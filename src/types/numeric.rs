//! Numeric element types and their sentinel values.
//!
//! ## Type Tags
//!
//! Models describe their variables with free-form type tags. Tags resolve the
//! way NumPy's `dtype()` constructor resolves them, so a model written against
//! the Python tester reports the same types here:
//!
//! | Tag | Type |
//! |-----|------|
//! | `float64`, `double`, `float`, `f8`, `d` | `f64` |
//! | `float32`, `single`, `f4`, `f` | `f32` |
//! | `int32`, `intc`, `i4` | `i32` |
//! | `int64`, `int`, `long`, `i8` | `i64` |
//! | `uint8`, `ubyte`, `u1` | `u8` |
//!
//! An optional byte-order prefix (`<`, `>`, `=`, `|`) is accepted and ignored.
//!
//! ## Sentinels
//!
//! | Kind | Sentinel |
//! |------|----------|
//! | Float | `NaN` |
//! | Signed integer | `-999` |
//! | Unsigned integer | `0` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;

/// Error type for type tag resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The tag does not name a supported numeric type.
    #[error("Unsupported variable type: {0:?}")]
    Unsupported(String),
}

/// Broad numeric kind of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    /// IEEE-754 floating point.
    Float,
    /// Two's complement signed integer.
    SignedInt,
    /// Unsigned integer.
    UnsignedInt,
}

impl NumericKind {
    /// The canonical placeholder value for this kind.
    pub fn sentinel(&self) -> Sentinel {
        match self {
            Self::Float => Sentinel::Nan,
            Self::SignedInt => Sentinel::Signed(-999),
            Self::UnsignedInt => Sentinel::Unsigned(0),
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::SignedInt => write!(f, "signed-int"),
            Self::UnsignedInt => write!(f, "unsigned-int"),
        }
    }
}

/// A "bad value" written into a buffer before a value call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Sentinel {
    /// Not-a-number. Never equal to itself; compare with `is_nan`.
    Nan,
    /// Signed integer placeholder.
    Signed(i64),
    /// Unsigned integer placeholder.
    Unsigned(u64),
}

impl Sentinel {
    /// Whether this sentinel is NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Nan)
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nan => write!(f, "NaN"),
            Self::Signed(v) => write!(f, "{}", v),
            Self::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

/// Concrete element type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
}

fn type_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[<>=|]?([A-Za-z]+)(\d*)$").expect("Type tag pattern is valid")
    })
}

impl ValueType {
    /// Resolve a model-reported type tag.
    pub fn parse(tag: &str) -> Result<Self, TypeError> {
        let unsupported = || TypeError::Unsupported(tag.to_string());

        let caps = type_tag_pattern()
            .captures(tag.trim())
            .ok_or_else(unsupported)?;
        let base = caps.get(1).map_or("", |m| m.as_str());
        let width = caps.get(2).map_or("", |m| m.as_str());

        let ty = match (base, width) {
            // Sized names
            ("float", "32") => Self::F32,
            ("float", "64") => Self::F64,
            ("int", "8") => Self::I8,
            ("int", "16") => Self::I16,
            ("int", "32") => Self::I32,
            ("int", "64") => Self::I64,
            ("uint", "8") => Self::U8,
            ("uint", "16") => Self::U16,
            ("uint", "32") => Self::U32,
            ("uint", "64") => Self::U64,

            // Array-protocol codes (width in bytes)
            ("f", "4") => Self::F32,
            ("f", "8") => Self::F64,
            ("i", "1") => Self::I8,
            ("i", "2") => Self::I16,
            ("i", "4") => Self::I32,
            ("i", "8") => Self::I64,
            ("u", "1") => Self::U8,
            ("u", "2") => Self::U16,
            ("u", "4") => Self::U32,
            ("u", "8") => Self::U64,

            // C-style names
            ("float" | "double" | "d", "") => Self::F64,
            ("single" | "f", "") => Self::F32,
            ("byte" | "b", "") => Self::I8,
            ("short" | "h", "") => Self::I16,
            ("intc" | "i", "") => Self::I32,
            ("int" | "long" | "longlong" | "l" | "q", "") => Self::I64,
            ("ubyte" | "B", "") => Self::U8,
            ("ushort" | "H", "") => Self::U16,
            ("uintc" | "I", "") => Self::U32,
            ("uint" | "ulong" | "ulonglong" | "L" | "Q", "") => Self::U64,

            _ => return Err(unsupported()),
        };

        Ok(ty)
    }

    /// Numeric kind of this type.
    pub fn kind(&self) -> NumericKind {
        match self {
            Self::F32 | Self::F64 => NumericKind::Float,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 => NumericKind::SignedInt,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => NumericKind::UnsignedInt,
        }
    }

    /// Width of one element in bits.
    pub fn bits(&self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 => 16,
            Self::F32 | Self::I32 | Self::U32 => 32,
            Self::F64 | Self::I64 | Self::U64 => 64,
        }
    }

    /// Width of one element in bytes.
    pub fn item_size(&self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Sentinel for this type's kind.
    pub fn sentinel(&self) -> Sentinel {
        self.kind().sentinel()
    }

    /// Canonical sized name, e.g. `float64`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
