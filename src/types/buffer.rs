//! Exchange buffers passed to and from `set_value` / `get_value`.
//!
//! A `ValueBuffer` is a fixed-length, typed container. Once allocated its
//! element type and length never change. [`ValueBuffer::copy_from`] rejects a
//! source of different type or length; [`ValueBuffer::cast_from`] converts
//! elements but still rejects a different length.

use serde::{Deserialize, Serialize};

use super::numeric::{Sentinel, ValueType};

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// Source and destination element types differ.
    #[error("Buffer type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Destination type.
        expected: ValueType,
        /// Source type.
        actual: ValueType,
    },

    /// Source and destination lengths differ.
    #[error("Buffer length mismatch: expected {expected}, found {actual}")]
    LengthMismatch {
        /// Destination length.
        expected: usize,
        /// Source length.
        actual: usize,
    },
}

/// Typed, fixed-length value buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "lowercase")]
pub enum ValueBuffer {
    /// `float32` values.
    F32(Vec<f32>),
    /// `float64` values.
    F64(Vec<f64>),
    /// `int8` values.
    I8(Vec<i8>),
    /// `int16` values.
    I16(Vec<i16>),
    /// `int32` values.
    I32(Vec<i32>),
    /// `int64` values.
    I64(Vec<i64>),
    /// `uint8` values.
    U8(Vec<u8>),
    /// `uint16` values.
    U16(Vec<u16>),
    /// `uint32` values.
    U32(Vec<u32>),
    /// `uint64` values.
    U64(Vec<u64>),
}

/// Apply `$body` to the inner vector of every variant.
macro_rules! each_variant {
    ($buf:expr, $v:ident => $body:expr) => {
        match $buf {
            ValueBuffer::F32($v) => $body,
            ValueBuffer::F64($v) => $body,
            ValueBuffer::I8($v) => $body,
            ValueBuffer::I16($v) => $body,
            ValueBuffer::I32($v) => $body,
            ValueBuffer::I64($v) => $body,
            ValueBuffer::U8($v) => $body,
            ValueBuffer::U16($v) => $body,
            ValueBuffer::U32($v) => $body,
            ValueBuffer::U64($v) => $body,
        }
    };
}

macro_rules! impl_from_vec {
    ($($variant:ident => $t:ty),* $(,)?) => {
        $(
            impl From<Vec<$t>> for ValueBuffer {
                fn from(values: Vec<$t>) -> Self {
                    Self::$variant(values)
                }
            }
        )*
    };
}

impl_from_vec! {
    F32 => f32, F64 => f64,
    I8 => i8, I16 => i16, I32 => i32, I64 => i64,
    U8 => u8, U16 => u16, U32 => u32, U64 => u64,
}

impl ValueBuffer {
    /// Allocate a zero-initialized buffer of `len` elements.
    pub fn empty(value_type: ValueType, len: usize) -> Self {
        match value_type {
            ValueType::F32 => Self::F32(vec![0.0; len]),
            ValueType::F64 => Self::F64(vec![0.0; len]),
            ValueType::I8 => Self::I8(vec![0; len]),
            ValueType::I16 => Self::I16(vec![0; len]),
            ValueType::I32 => Self::I32(vec![0; len]),
            ValueType::I64 => Self::I64(vec![0; len]),
            ValueType::U8 => Self::U8(vec![0; len]),
            ValueType::U16 => Self::U16(vec![0; len]),
            ValueType::U32 => Self::U32(vec![0; len]),
            ValueType::U64 => Self::U64(vec![0; len]),
        }
    }

    /// Element type of this buffer.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::F32(_) => ValueType::F32,
            Self::F64(_) => ValueType::F64,
            Self::I8(_) => ValueType::I8,
            Self::I16(_) => ValueType::I16,
            Self::I32(_) => ValueType::I32,
            Self::I64(_) => ValueType::I64,
            Self::U8(_) => ValueType::U8,
            Self::U16(_) => ValueType::U16,
            Self::U32(_) => ValueType::U32,
            Self::U64(_) => ValueType::U64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        each_variant!(self, v => v.len())
    }

    /// Whether the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite every element with `sentinel`.
    ///
    /// Integer sentinels are narrowed to the element type with a wrapping
    /// cast, so `-999` stored in an `int8` buffer reads back as `25`.
    /// [`ValueBuffer::is_filled_with`] compares against the same narrowed value.
    pub fn fill(&mut self, sentinel: Sentinel) {
        match sentinel {
            Sentinel::Nan => match self {
                Self::F32(v) => v.fill(f32::NAN),
                Self::F64(v) => v.fill(f64::NAN),
                _ => each_variant!(self, v => v.fill(Default::default())),
            },
            Sentinel::Signed(s) => self.fill_integer(s as i128),
            Sentinel::Unsigned(s) => self.fill_integer(s as i128),
        }
    }

    /// Fill with this buffer's own sentinel.
    pub fn fill_sentinel(&mut self) {
        self.fill(self.value_type().sentinel());
    }

    fn fill_integer(&mut self, value: i128) {
        match self {
            Self::F32(v) => v.fill(value as f32),
            Self::F64(v) => v.fill(value as f64),
            Self::I8(v) => v.fill(value as i8),
            Self::I16(v) => v.fill(value as i16),
            Self::I32(v) => v.fill(value as i32),
            Self::I64(v) => v.fill(value as i64),
            Self::U8(v) => v.fill(value as u8),
            Self::U16(v) => v.fill(value as u16),
            Self::U32(v) => v.fill(value as u32),
            Self::U64(v) => v.fill(value as u64),
        }
    }

    /// Whether every element still holds `sentinel`.
    ///
    /// NaN never compares equal to itself, so the NaN sentinel is checked with
    /// `is_nan`. Integer sentinels use exact equality. An empty buffer is
    /// trivially filled.
    pub fn is_filled_with(&self, sentinel: Sentinel) -> bool {
        if sentinel.is_nan() {
            return match self {
                Self::F32(v) => v.iter().all(|x| x.is_nan()),
                Self::F64(v) => v.iter().all(|x| x.is_nan()),
                _ => false,
            };
        }

        let mut expected = self.clone();
        expected.fill(sentinel);
        *self == expected
    }

    /// Whether at least one element differs from the same position in `other`.
    ///
    /// Two NaNs at the same position count as unchanged. Buffers of different
    /// type or length always differ.
    pub fn differs_from(&self, other: &ValueBuffer) -> bool {
        fn any_float_diff<T: Copy + PartialEq>(a: &[T], b: &[T], is_nan: fn(T) -> bool) -> bool {
            a.iter().zip(b).any(|(&x, &y)| !(x == y || (is_nan(x) && is_nan(y))))
        }

        if self.value_type() != other.value_type() || self.len() != other.len() {
            return true;
        }

        match (self, other) {
            (Self::F32(a), Self::F32(b)) => any_float_diff(a, b, f32::is_nan),
            (Self::F64(a), Self::F64(b)) => any_float_diff(a, b, f64::is_nan),
            _ => self != other,
        }
    }

    /// Copy every element of `src` into this buffer, in place.
    ///
    /// The type and length of `self` are fixed; a mismatching source is an error
    /// and leaves `self` untouched.
    pub fn copy_from(&mut self, src: &ValueBuffer) -> Result<(), BufferError> {
        if self.value_type() != src.value_type() {
            return Err(BufferError::TypeMismatch {
                expected: self.value_type(),
                actual: src.value_type(),
            });
        }
        if self.len() != src.len() {
            return Err(BufferError::LengthMismatch {
                expected: self.len(),
                actual: src.len(),
            });
        }

        match (self, src) {
            (Self::F32(d), Self::F32(s)) => d.copy_from_slice(s),
            (Self::F64(d), Self::F64(s)) => d.copy_from_slice(s),
            (Self::I8(d), Self::I8(s)) => d.copy_from_slice(s),
            (Self::I16(d), Self::I16(s)) => d.copy_from_slice(s),
            (Self::I32(d), Self::I32(s)) => d.copy_from_slice(s),
            (Self::I64(d), Self::I64(s)) => d.copy_from_slice(s),
            (Self::U8(d), Self::U8(s)) => d.copy_from_slice(s),
            (Self::U16(d), Self::U16(s)) => d.copy_from_slice(s),
            (Self::U32(d), Self::U32(s)) => d.copy_from_slice(s),
            (Self::U64(d), Self::U64(s)) => d.copy_from_slice(s),
            _ => unreachable!("value types checked above"),
        }
        Ok(())
    }

    /// Copy every element of `src` into this buffer, converting to this
    /// buffer's element type.
    ///
    /// Elements convert with `as` semantics: floats truncate toward zero and
    /// saturate into integers (NaN becomes 0), integers wrap when narrowed.
    /// Only the length must match; on mismatch `self` is left untouched.
    pub fn cast_from(&mut self, src: &ValueBuffer) -> Result<(), BufferError> {
        if self.len() != src.len() {
            return Err(BufferError::LengthMismatch {
                expected: self.len(),
                actual: src.len(),
            });
        }

        macro_rules! cast_into {
            ($dst:expr, $t:ty) => {
                each_variant!(src, s => {
                    for (d, &x) in $dst.iter_mut().zip(s.iter()) {
                        *d = x as $t;
                    }
                })
            };
        }

        match self {
            Self::F32(d) => cast_into!(d, f32),
            Self::F64(d) => cast_into!(d, f64),
            Self::I8(d) => cast_into!(d, i8),
            Self::I16(d) => cast_into!(d, i16),
            Self::I32(d) => cast_into!(d, i32),
            Self::I64(d) => cast_into!(d, i64),
            Self::U8(d) => cast_into!(d, u8),
            Self::U16(d) => cast_into!(d, u16),
            Self::U32(d) => cast_into!(d, u32),
            Self::U64(d) => cast_into!(d, u64),
        }
        Ok(())
    }

    /// The buffer as `f64` values, if it holds `float64`.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Self::F64(v) => Some(v),
            _ => None,
        }
    }

    /// The buffer as `i32` values, if it holds `int32`.
    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            Self::I32(v) => Some(v),
            _ => None,
        }
    }
}
