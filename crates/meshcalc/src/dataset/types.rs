use super::output::Output;
use crate::error::DatasetError;

/// Where an output's values live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Centering {
    Node,
    Element,
}

/// Named, possibly time-varying series of outputs.
///
/// Invariants:
/// - All outputs share centering and vector-ness (checked by `add_output`).
/// - A static dataset holds at most one output.
/// - Output `k` is addressed by its step index; outputs do not point back.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    name: String,
    vector: bool,
    time_varying: bool,
    outputs: Vec<Output>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, vector: bool, time_varying: bool) -> Self {
        Self {
            name: name.into(),
            vector,
            time_varying,
            outputs: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
    #[inline]
    pub fn is_vector(&self) -> bool {
        self.vector
    }
    #[inline]
    pub fn is_time_varying(&self) -> bool {
        self.time_varying
    }
    #[inline]
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }
    #[inline]
    pub fn output(&self, step: usize) -> Option<&Output> {
        self.outputs.get(step)
    }
    #[inline]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Centering of the first output, if any.
    pub fn centering(&self) -> Option<Centering> {
        self.outputs.first().map(Output::centering)
    }

    /// Time stamps of all outputs, in step order.
    pub fn times(&self) -> Vec<f64> {
        self.outputs.iter().map(Output::time).collect()
    }

    /// Append an output; returns its step index.
    pub fn add_output(&mut self, output: Output) -> Result<usize, DatasetError> {
        self.check_fits(&output)?;
        if !self.time_varying && !self.outputs.is_empty() {
            return Err(DatasetError::StaticOverflow {
                dataset: self.name.clone(),
            });
        }
        self.outputs.push(output);
        Ok(self.outputs.len() - 1)
    }

    fn check_fits(&self, output: &Output) -> Result<(), DatasetError> {
        if output.is_vector() != self.vector {
            return Err(DatasetError::VectorMismatch {
                dataset: self.name.clone(),
            });
        }
        if let Some(c) = self.centering() {
            if c != output.centering() {
                return Err(DatasetError::CenteringMismatch {
                    dataset: self.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Move every output of `from` to the end of `self`, leaving `from` empty.
    ///
    /// All-or-nothing: on error both datasets are unchanged.
    pub fn transfer_outputs(&mut self, from: &mut Dataset) -> Result<(), DatasetError> {
        for o in &from.outputs {
            self.check_fits(o)?;
        }
        if let Some(first) = from.outputs.first() {
            if from.outputs.iter().any(|o| o.centering() != first.centering()) {
                return Err(DatasetError::CenteringMismatch {
                    dataset: from.name.clone(),
                });
            }
        }
        if !self.time_varying && self.outputs.len() + from.outputs.len() > 1 {
            return Err(DatasetError::StaticOverflow {
                dataset: self.name.clone(),
            });
        }
        self.outputs.append(&mut from.outputs);
        Ok(())
    }
}
