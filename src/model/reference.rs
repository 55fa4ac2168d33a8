//! In-memory reference model for testing.
//!
//! `ReferenceModel` implements [`Bmi`] over plain maps. Its default behavior
//! conforms to BMI 2.0; [`ReferenceBehavior`] switches on the legacy or broken
//! behaviors the harness has to recognize.

use std::collections::BTreeMap;

use crate::types::{ValueBuffer, ValueType};
use super::{Bmi, BmiError, ModelCapabilities};

/// Grid topology counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of edges.
    pub edges: usize,
    /// Number of faces.
    pub faces: usize,
}

/// What `set_value` hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetValueReturn {
    /// The caller's buffer.
    #[default]
    Buffer,
    /// Nothing.
    Nothing,
    /// A different buffer owned by the model.
    Foreign,
}

/// Switches for non-conforming behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceBehavior {
    /// Declared capabilities.
    pub capabilities: ModelCapabilities,
    /// What `set_value` returns.
    pub set_value_returns: SetValueReturn,
    /// Whether `set_value` overwrites the caller's buffer after storing it.
    pub clobbers_input: bool,
    /// Whether `get_value_into` writes into the destination.
    pub writes_output: bool,
    /// Whether `get_value_into` hands back a model-owned buffer instead of `dest`.
    pub returns_foreign_output: bool,
}

impl Default for ReferenceBehavior {
    fn default() -> Self {
        Self {
            capabilities: ModelCapabilities::default(),
            set_value_returns: SetValueReturn::Buffer,
            clobbers_input: false,
            writes_output: true,
            returns_foreign_output: false,
        }
    }
}

#[derive(Debug, Clone)]
struct ReferenceVar {
    grid: i32,
    location: String,
    type_tag: String,
    values: ValueBuffer,
    input: bool,
    output: bool,
}

/// In-memory BMI model.
///
/// Uses BTreeMap for deterministic variable ordering.
#[derive(Debug, Clone)]
pub struct ReferenceModel {
    name: String,
    grids: BTreeMap<i32, GridSpec>,
    vars: BTreeMap<String, ReferenceVar>,
    behavior: ReferenceBehavior,
    /// Returned by misbehaving `set_value` / `get_value_into`.
    scratch: ValueBuffer,
}

impl ReferenceModel {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grids: BTreeMap::new(),
            vars: BTreeMap::new(),
            behavior: ReferenceBehavior::default(),
            scratch: ValueBuffer::F64(Vec::new()),
        }
    }

    /// Add a grid.
    pub fn with_grid(mut self, id: i32, nodes: usize, edges: usize, faces: usize) -> Self {
        self.grids.insert(id, GridSpec { nodes, edges, faces });
        self
    }

    /// Add an input variable (accepted by `set_value`).
    pub fn with_input(self, name: &str, type_tag: &str, grid: i32, location: &str) -> Self {
        self.with_var(name, type_tag, grid, location, true, false)
    }

    /// Add an output variable (exposed by `get_value`).
    pub fn with_output(self, name: &str, type_tag: &str, grid: i32, location: &str) -> Self {
        self.with_var(name, type_tag, grid, location, false, true)
    }

    /// Add a variable that is both input and output.
    pub fn with_exchange(self, name: &str, type_tag: &str, grid: i32, location: &str) -> Self {
        self.with_var(name, type_tag, grid, location, true, true)
    }

    /// Add a variable.
    ///
    /// Values are initialized to `1, 2, 3, ...` so they never equal a
    /// sentinel. Unknown grids, unsupported type tags and unknown locations
    /// get an empty value array; the model still reports the raw metadata.
    pub fn with_var(
        mut self,
        name: &str,
        type_tag: &str,
        grid: i32,
        location: &str,
        input: bool,
        output: bool,
    ) -> Self {
        let len = self
            .grids
            .get(&grid)
            .map(|g| match location {
                "node" => g.nodes,
                "edge" => g.edges,
                "face" => g.faces,
                _ => 0,
            })
            .unwrap_or(0);
        let values = match ValueType::parse(type_tag) {
            Ok(ty) => ramp(ty, len),
            Err(_) => ValueBuffer::F64(Vec::new()),
        };

        self.vars.insert(
            name.to_string(),
            ReferenceVar {
                grid,
                location: location.to_string(),
                type_tag: type_tag.to_string(),
                values,
                input,
                output,
            },
        );
        self
    }

    /// Replace the behavior switches.
    pub fn with_behavior(mut self, behavior: ReferenceBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Current values of a variable.
    pub fn values(&self, name: &str) -> Option<&ValueBuffer> {
        self.vars.get(name).map(|v| &v.values)
    }

    fn var(&self, name: &str) -> Result<&ReferenceVar, BmiError> {
        self.vars
            .get(name)
            .ok_or_else(|| BmiError::UnknownVariable(name.to_string()))
    }

    fn grid(&self, id: i32) -> Result<&GridSpec, BmiError> {
        self.grids.get(&id).ok_or(BmiError::UnknownGrid(id))
    }
}

/// A buffer holding `1, 2, ..., len`.
fn ramp(ty: ValueType, len: usize) -> ValueBuffer {
    let mut buf = ValueBuffer::empty(ty, len);
    match &mut buf {
        ValueBuffer::F32(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i + 1) as f32),
        ValueBuffer::F64(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i + 1) as f64),
        ValueBuffer::I8(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i % 100 + 1) as i8),
        ValueBuffer::I16(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i % 10_000 + 1) as i16),
        ValueBuffer::I32(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i + 1) as i32),
        ValueBuffer::I64(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i + 1) as i64),
        ValueBuffer::U8(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i % 200 + 1) as u8),
        ValueBuffer::U16(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i % 60_000 + 1) as u16),
        ValueBuffer::U32(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i + 1) as u32),
        ValueBuffer::U64(v) => v.iter_mut().enumerate().for_each(|(i, x)| *x = (i + 1) as u64),
    }
    buf
}

impl Bmi for ReferenceModel {
    fn capabilities(&self) -> ModelCapabilities {
        self.behavior.capabilities
    }

    fn get_component_name(&self) -> Result<String, BmiError> {
        Ok(self.name.clone())
    }

    fn get_input_var_names(&self) -> Result<Vec<String>, BmiError> {
        Ok(self.vars.iter().filter(|(_, v)| v.input).map(|(k, _)| k.clone()).collect())
    }

    fn get_output_var_names(&self) -> Result<Vec<String>, BmiError> {
        Ok(self.vars.iter().filter(|(_, v)| v.output).map(|(k, _)| k.clone()).collect())
    }

    fn get_var_grid(&self, name: &str) -> Result<i32, BmiError> {
        Ok(self.var(name)?.grid)
    }

    fn get_var_location(&self, name: &str) -> Result<String, BmiError> {
        if !self.behavior.capabilities.var_location {
            return Err(BmiError::NotImplemented("get_var_location"));
        }
        Ok(self.var(name)?.location.clone())
    }

    fn get_var_type(&self, name: &str) -> Result<String, BmiError> {
        Ok(self.var(name)?.type_tag.clone())
    }

    fn get_grid_size(&self, grid: i32) -> Result<usize, BmiError> {
        Ok(self.grid(grid)?.nodes)
    }

    fn get_grid_number_of_edges(&self, grid: i32) -> Result<usize, BmiError> {
        Ok(self.grid(grid)?.edges)
    }

    fn set_value<'a>(
        &'a mut self,
        name: &str,
        src: &'a mut ValueBuffer,
    ) -> Result<Option<&'a ValueBuffer>, BmiError> {
        let var = self
            .vars
            .get_mut(name)
            .ok_or_else(|| BmiError::UnknownVariable(name.to_string()))?;
        var.values
            .copy_from(src)
            .map_err(|e| BmiError::Other(e.to_string()))?;

        if self.behavior.clobbers_input {
            let ty = src.value_type();
            let len = src.len();
            *src = ramp(ty, len);
        }

        Ok(match self.behavior.set_value_returns {
            SetValueReturn::Buffer => Some(&*src),
            SetValueReturn::Nothing => None,
            SetValueReturn::Foreign => {
                self.scratch = src.clone();
                Some(&self.scratch)
            }
        })
    }

    fn get_value_into<'a>(
        &'a mut self,
        name: &str,
        dest: &'a mut ValueBuffer,
    ) -> Result<&'a ValueBuffer, BmiError> {
        let values = &self.var(name)?.values;
        if self.behavior.writes_output {
            dest.copy_from(values).map_err(|e| BmiError::Other(e.to_string()))?;
        }

        if self.behavior.returns_foreign_output {
            self.scratch = dest.clone();
            return Ok(&self.scratch);
        }
        Ok(&*dest)
    }

    fn get_value(&mut self, name: &str) -> Result<ValueBuffer, BmiError> {
        let values = &self.var(name)?.values;
        if self.behavior.writes_output {
            Ok(values.clone())
        } else {
            let mut untouched = values.clone();
            untouched.fill_sentinel();
            Ok(untouched)
        }
    }
}
