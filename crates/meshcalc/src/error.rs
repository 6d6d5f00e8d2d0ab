//! Error enums for the fallible boundaries of the crate.
//!
//! Geometric predicates do not use these: "point not in element" is `None`,
//! not an error.

/// Rejected mesh topology.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("element {element} references node {node}, but the mesh has {node_count} nodes")]
    NodeOutOfRange {
        element: usize,
        node: usize,
        node_count: usize,
    },
    #[error("polygon element needs at least 3 nodes, got {0}")]
    PolygonTooSmall(usize),
    #[error("an element cannot be built from a single node")]
    SingleNode,
}

/// The installed coordinate transform could not map the mesh.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("coordinate transform failed at node {node}")]
    NodeFailed { node: usize },
}

/// Output did not fit its dataset or mesh.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("dataset `{dataset}` mixes scalar and vector outputs")]
    VectorMismatch { dataset: String },
    #[error("dataset `{dataset}` mixes node- and element-centered outputs")]
    CenteringMismatch { dataset: String },
    #[error("static dataset `{dataset}` can hold only one output")]
    StaticOverflow { dataset: String },
    #[error("output {step} of `{dataset}` has {got} values, the mesh expects {expected}")]
    SizeMismatch {
        dataset: String,
        step: usize,
        got: usize,
        expected: usize,
    },
    #[error("output has {got} active flags, the mesh has {expected} elements")]
    ActiveSizeMismatch { got: usize, expected: usize },
}

/// Refusal of the dataset algebra engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("dataset `{0}` is not present on the mesh")]
    MissingDataset(String),
    #[error("dataset `{0}` has no outputs")]
    EmptyDataset(String),
    #[error("dataset `{dataset}` has {got} time steps, expected {expected}")]
    StepCountMismatch {
        dataset: String,
        expected: usize,
        got: usize,
    },
    #[error("dataset `{dataset}` step {step} is at time {got}, expected {expected}")]
    TimeMismatch {
        dataset: String,
        step: usize,
        expected: f64,
        got: f64,
    },
    #[error("dataset `{dataset}` has no output for step {step} ({available} available)")]
    StepOutOfRange {
        dataset: String,
        step: usize,
        available: usize,
    },
    #[error("dataset `{dataset}` has {got} values per output, the mesh expects {expected}")]
    SizeMismatch {
        dataset: String,
        expected: usize,
        got: usize,
    },
    #[error("dataset `{dataset}` mixes node- and element-centered outputs")]
    CenteringMismatch { dataset: String },
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
