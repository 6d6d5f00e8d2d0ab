//! `DatasetCalc`: validated view over a mesh's datasets plus the traversal
//! routines every operator runs through.

use super::ops::{AggrOp, BinaryOp, UnaryOp};
use crate::dataset::{is_nodata, Centering, Dataset, Output, NODATA};
use crate::error::CalcError;
use crate::mesh::Mesh;

/// Calculator configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalcCfg {
    /// Absolute tolerance when matching step times across datasets.
    pub time_eps: f64,
}

impl Default for CalcCfg {
    fn default() -> Self {
        Self { time_eps: 1e-5 }
    }
}

/// Derives new datasets from a fixed set of datasets on one mesh.
///
/// Invariants (checked once, at construction):
/// - every used name resolves to a dataset with at least one output;
/// - time-varying used datasets share step count and step times;
/// - `times` is that shared axis, or `[0.0]` when nothing varies in time.
///
/// A calculator that failed validation returns the validation error from
/// every operator.
#[derive(Clone, Debug)]
pub struct DatasetCalc<'m> {
    mesh: &'m Mesh,
    used: Vec<&'m Dataset>,
    times: Vec<f64>,
    status: Result<(), CalcError>,
}

type Validated<'m> = (Vec<&'m Dataset>, Vec<f64>);

fn validate<'m, S: AsRef<str>>(
    mesh: &'m Mesh,
    names: &[S],
    cfg: CalcCfg,
) -> Result<Validated<'m>, CalcError> {
    let used = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            mesh.dataset(name)
                .ok_or_else(|| CalcError::MissingDataset(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut times: Option<Vec<f64>> = None;
    for ds in &used {
        if ds.output_count() == 0 {
            return Err(CalcError::EmptyDataset(ds.name().to_string()));
        }
        if !ds.is_time_varying() {
            continue;
        }
        let ds_times = ds.times();
        match &times {
            None => times = Some(ds_times),
            Some(axis) => {
                if axis.len() != ds_times.len() {
                    return Err(CalcError::StepCountMismatch {
                        dataset: ds.name().to_string(),
                        expected: axis.len(),
                        got: ds_times.len(),
                    });
                }
                for (step, (&expected, &got)) in axis.iter().zip(&ds_times).enumerate() {
                    if (expected - got).abs() > cfg.time_eps {
                        return Err(CalcError::TimeMismatch {
                            dataset: ds.name().to_string(),
                            step,
                            expected,
                            got,
                        });
                    }
                }
            }
        }
    }
    Ok((used, times.unwrap_or_else(|| vec![0.0])))
}

#[inline]
fn combine(op: BinaryOp, a: Option<f64>, b: Option<f64>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if !is_nodata(a) && !is_nodata(b) => op.apply(a, b),
        _ => NODATA,
    }
}

impl<'m> DatasetCalc<'m> {
    pub fn new<S: AsRef<str>>(mesh: &'m Mesh, used_names: &[S]) -> Self {
        Self::with_cfg(mesh, used_names, CalcCfg::default())
    }

    pub fn with_cfg<S: AsRef<str>>(mesh: &'m Mesh, used_names: &[S], cfg: CalcCfg) -> Self {
        match validate(mesh, used_names, cfg) {
            Ok((used, times)) => {
                tracing::debug!(datasets = used.len(), steps = times.len(), "dataset calculator ready");
                Self {
                    mesh,
                    used,
                    times,
                    status: Ok(()),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "dataset calculator is invalid");
                Self {
                    mesh,
                    used: Vec::new(),
                    times: Vec::new(),
                    status: Err(e),
                }
            }
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.status.is_ok()
    }

    /// `Ok(())` or the reason validation failed.
    #[inline]
    pub fn status(&self) -> Result<(), CalcError> {
        self.status.clone()
    }

    #[inline]
    pub fn mesh(&self) -> &'m Mesh {
        self.mesh
    }

    /// Shared time axis (empty for an invalid calculator).
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// One of the used datasets, by name.
    pub fn dataset(&self, name: &str) -> Option<&'m Dataset> {
        self.used.iter().copied().find(|d| d.name() == name)
    }

    // ----- operators -----

    /// Static node-centered dataset with every value `v`.
    pub fn number(&self, v: f64) -> Result<Dataset, CalcError> {
        self.filled("number", v)
    }

    pub fn ones(&self) -> Result<Dataset, CalcError> {
        self.filled("ones", 1.0)
    }

    pub fn nodata(&self) -> Result<Dataset, CalcError> {
        self.filled("nodata", NODATA)
    }

    /// Deep copy of a used dataset.
    pub fn copy(&self, name: &str) -> Result<Dataset, CalcError> {
        self.status()?;
        let ds = self
            .dataset(name)
            .ok_or_else(|| CalcError::MissingDataset(name.to_string()))?;
        self.copy_dataset(ds)
    }

    /// Deep copy of any dataset defined on this mesh, named `copy(<source>)`.
    pub fn copy_dataset(&self, ds: &Dataset) -> Result<Dataset, CalcError> {
        self.status()?;
        let name = format!("copy({})", ds.name());
        let mut out = Dataset::new(name, ds.is_vector(), ds.is_time_varying());
        for o in ds.outputs() {
            self.check_size(ds, o)?;
            out.add_output(o.clone())?;
        }
        Ok(out)
    }

    /// Elementwise `op` over every output of `ds`; sentinel stays sentinel.
    pub fn unary(&self, ds: &Dataset, op: UnaryOp) -> Result<Dataset, CalcError> {
        self.status()?;
        tracing::trace!(op = op.name(), dataset = ds.name(), "unary");
        let name = format!("{}({})", op.name(), ds.name());
        let mut out = Dataset::new(name, false, ds.is_time_varying());
        for step in 0..ds.output_count() {
            let o1 = self.candidate_output(ds, step)?;
            self.check_size(ds, o1)?;
            let mut o = self.alloc(o1.centering(), o1.time());
            for (dst, &v) in o.values_mut().iter_mut().zip(o1.values()) {
                *dst = if is_nodata(v) { NODATA } else { op.apply(v) };
            }
            out.add_output(o)?;
        }
        Ok(out)
    }

    /// Elementwise `op` over two datasets.
    ///
    /// Step count is the shared axis when both vary in time, else 1. Mixed
    /// centering yields an element-centered result evaluated at each
    /// element's (projected) centroid.
    pub fn binary(&self, a: &Dataset, b: &Dataset, op: BinaryOp) -> Result<Dataset, CalcError> {
        self.status()?;
        let both_varying = a.is_time_varying() && b.is_time_varying();
        let steps = if both_varying { self.times.len() } else { 1 };
        tracing::trace!(op = op.name(), a = a.name(), b = b.name(), steps, "binary");
        let name = format!("{}({},{})", op.name(), a.name(), b.name());
        let mut out = Dataset::new(name, false, both_varying);
        for step in 0..steps {
            let o1 = self.candidate_output(a, step)?;
            let o2 = self.candidate_output(b, step)?;
            self.check_size(a, o1)?;
            self.check_size(b, o2)?;
            let time = if both_varying {
                self.times[step]
            } else if a.is_time_varying() {
                o1.time()
            } else {
                o2.time()
            };
            let o = if o1.centering() == o2.centering() {
                let mut o = self.alloc(o1.centering(), time);
                for ((dst, &v1), &v2) in o.values_mut().iter_mut().zip(o1.values()).zip(o2.values()) {
                    *dst = combine(op, Some(v1), Some(v2));
                }
                o
            } else {
                let mut o = self.alloc(Centering::Element, time);
                for (i, dst) in o.values_mut().iter_mut().enumerate() {
                    let c = self.mesh.element_centroid(i);
                    let v1 = self.mesh.element_value(i, c, o1);
                    let v2 = self.mesh.element_value(i, c, o2);
                    *dst = combine(op, v1, v2);
                }
                o
            };
            out.add_output(o)?;
        }
        Ok(out)
    }

    /// Collapse the whole time series of `ds` into one static output.
    pub fn aggregate(&self, ds: &Dataset, op: AggrOp) -> Result<Dataset, CalcError> {
        self.status()?;
        tracing::trace!(op = op.name(), dataset = ds.name(), "aggregate");
        let centering = self.candidate_output(ds, 0)?.centering();
        let series = (0..ds.output_count())
            .map(|step| self.candidate_output(ds, step))
            .collect::<Result<Vec<_>, _>>()?;
        for o in &series {
            if o.centering() != centering {
                return Err(CalcError::CenteringMismatch {
                    dataset: ds.name().to_string(),
                });
            }
            self.check_size(ds, o)?;
        }
        let mut o = self.alloc(centering, 0.0);
        let mut vals = Vec::with_capacity(series.len());
        for (i, dst) in o.values_mut().iter_mut().enumerate() {
            vals.clear();
            vals.extend(series.iter().map(|s| s.value(i)).filter(|v| !is_nodata(*v)));
            *dst = if vals.is_empty() { NODATA } else { op.apply(&vals) };
        }
        let mut out = Dataset::new(format!("{}({})", op.name(), ds.name()), false, false);
        out.add_output(o)?;
        Ok(out)
    }

    // ----- helpers -----

    fn filled(&self, name: &str, v: f64) -> Result<Dataset, CalcError> {
        self.status()?;
        let mut o = self.alloc(Centering::Node, 0.0);
        o.values_mut().fill(v);
        let mut out = Dataset::new(name, false, false);
        out.add_output(o)?;
        Ok(out)
    }

    #[inline]
    fn alloc(&self, centering: Centering, time: f64) -> Output {
        Output::zeroed(self.mesh, centering, false).with_time(time)
    }

    /// The output standing for logical step `step`: the step's own output if
    /// `ds` varies in time, its only output otherwise.
    fn candidate_output<'d>(&self, ds: &'d Dataset, step: usize) -> Result<&'d Output, CalcError> {
        let index = if ds.is_time_varying() { step } else { 0 };
        ds.output(index).ok_or_else(|| CalcError::StepOutOfRange {
            dataset: ds.name().to_string(),
            step,
            available: ds.output_count(),
        })
    }

    fn check_size(&self, ds: &Dataset, o: &Output) -> Result<(), CalcError> {
        let expected = self.mesh.location_count(o.centering());
        if o.len() != expected || o.active().len() != self.mesh.element_count() {
            return Err(CalcError::SizeMismatch {
                dataset: ds.name().to_string(),
                expected,
                got: o.len(),
            });
        }
        Ok(())
    }
}
