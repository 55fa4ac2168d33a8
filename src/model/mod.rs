//! The model-under-test interface.
//!
//! [`Bmi`] is the call surface the harness consumes. Adapters wrap a concrete
//! model (native, FFI, or remote) and declare once, through
//! [`ModelCapabilities`], which optional parts of the protocol they expose.

pub mod reference;

use crate::types::ValueBuffer;

/// Error raised by a model under test.
///
/// The harness never recovers from these; they fail the check that made the
/// call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BmiError {
    /// The model does not implement this function.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// No variable with this name.
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// No grid with this identifier.
    #[error("Unknown grid: {0}")]
    UnknownGrid(i32),

    /// Any other model failure.
    #[error("Model error: {0}")]
    Other(String),
}

/// Which `get_value` calling convention a model supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GetValueConvention {
    /// `get_value(name, dest)` fills a caller-provided buffer in place.
    #[default]
    InPlace,
    /// `get_value(name)` returns a freshly allocated buffer (legacy).
    Returning,
}

/// Optional protocol features a model adapter declares up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelCapabilities {
    /// Whether `get_var_location` is implemented.
    pub var_location: bool,
    /// Supported `get_value` calling convention.
    pub get_value: GetValueConvention,
}

impl Default for ModelCapabilities {
    fn default() -> Self {
        Self {
            var_location: true,
            get_value: GetValueConvention::InPlace,
        }
    }
}

impl ModelCapabilities {
    /// Capabilities of a model written against BMI 1.0.
    pub fn legacy() -> Self {
        Self {
            var_location: false,
            get_value: GetValueConvention::Returning,
        }
    }
}

/// Basic Model Interface: the metadata and value-exchange subset.
///
/// Calls are synchronous and are made at most once per check. Implementations
/// must not change a variable's grid, location, or type between calls within
/// one check.
pub trait Bmi {
    /// Declared optional capabilities. Read once per check.
    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::default()
    }

    /// Name of the model component.
    fn get_component_name(&self) -> Result<String, BmiError>;

    /// Names of variables the model accepts through `set_value`.
    fn get_input_var_names(&self) -> Result<Vec<String>, BmiError>;

    /// Names of variables the model exposes through `get_value`.
    fn get_output_var_names(&self) -> Result<Vec<String>, BmiError>;

    /// Grid identifier of a variable.
    fn get_var_grid(&self, name: &str) -> Result<i32, BmiError>;

    /// Grid location of a variable (`"node"`, `"edge"` or `"face"`).
    ///
    /// Introduced in BMI 1.1.
    fn get_var_location(&self, _name: &str) -> Result<String, BmiError> {
        Err(BmiError::NotImplemented("get_var_location"))
    }

    /// Type tag of a variable, e.g. `"float64"` or `"int32"`.
    fn get_var_type(&self, name: &str) -> Result<String, BmiError>;

    /// Number of nodes of a grid.
    fn get_grid_size(&self, grid: i32) -> Result<usize, BmiError>;

    /// Number of edges of a grid.
    fn get_grid_number_of_edges(&self, grid: i32) -> Result<usize, BmiError>;

    /// Copy `src` into the model's variable.
    ///
    /// Conforming models hand `src` back for chaining. Returning `None` is
    /// tolerated; returning any other buffer is a contract violation.
    fn set_value<'a>(
        &'a mut self,
        name: &str,
        src: &'a mut ValueBuffer,
    ) -> Result<Option<&'a ValueBuffer>, BmiError>;

    /// Copy the model's variable into `dest` and return `dest`.
    ///
    /// Only called when [`ModelCapabilities::get_value`] is
    /// [`GetValueConvention::InPlace`].
    fn get_value_into<'a>(
        &'a mut self,
        _name: &str,
        _dest: &'a mut ValueBuffer,
    ) -> Result<&'a ValueBuffer, BmiError> {
        Err(BmiError::NotImplemented("get_value_into"))
    }

    /// Return a newly allocated copy of the model's variable.
    ///
    /// Only called when [`ModelCapabilities::get_value`] is
    /// [`GetValueConvention::Returning`].
    fn get_value(&mut self, _name: &str) -> Result<ValueBuffer, BmiError> {
        Err(BmiError::NotImplemented("get_value"))
    }
}

impl<M: Bmi + ?Sized> Bmi for Box<M> {
    fn capabilities(&self) -> ModelCapabilities {
        (**self).capabilities()
    }

    fn get_component_name(&self) -> Result<String, BmiError> {
        (**self).get_component_name()
    }

    fn get_input_var_names(&self) -> Result<Vec<String>, BmiError> {
        (**self).get_input_var_names()
    }

    fn get_output_var_names(&self) -> Result<Vec<String>, BmiError> {
        (**self).get_output_var_names()
    }

    fn get_var_grid(&self, name: &str) -> Result<i32, BmiError> {
        (**self).get_var_grid(name)
    }

    fn get_var_location(&self, name: &str) -> Result<String, BmiError> {
        (**self).get_var_location(name)
    }

    fn get_var_type(&self, name: &str) -> Result<String, BmiError> {
        (**self).get_var_type(name)
    }

    fn get_grid_size(&self, grid: i32) -> Result<usize, BmiError> {
        (**self).get_grid_size(grid)
    }

    fn get_grid_number_of_edges(&self, grid: i32) -> Result<usize, BmiError> {
        (**self).get_grid_number_of_edges(grid)
    }

    fn set_value<'a>(
        &'a mut self,
        name: &str,
        src: &'a mut ValueBuffer,
    ) -> Result<Option<&'a ValueBuffer>, BmiError> {
        (**self).set_value(name, src)
    }

    fn get_value_into<'a>(
        &'a mut self,
        name: &str,
        dest: &'a mut ValueBuffer,
    ) -> Result<&'a ValueBuffer, BmiError> {
        (**self).get_value_into(name, dest)
    }

    fn get_value(&mut self, name: &str) -> Result<ValueBuffer, BmiError> {
        (**self).get_value(name)
    }
}

pub use reference::{ReferenceModel, ReferenceBehavior, SetValueReturn, GridSpec};
