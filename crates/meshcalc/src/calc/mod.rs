//! Dataset algebra: derive new datasets from existing ones on one mesh.
//!
//! Purpose
//! - Validate a set of input datasets once (presence, non-emptiness, shared
//!   time axis) and then apply constant, copy, unary, binary and aggregate
//!   operators to them.
//!
//! Why this design
//! - Three traversal routines (`unary`, `binary`, `aggregate`) own all
//!   per-step, per-location iteration and sentinel handling; operators are
//!   plain enums with an `apply`, so adding one touches a single table.
//! - Results are fresh `Dataset`s the caller owns; inputs are never mutated
//!   and the calculator only borrows the mesh.
//!
//! Mixed centering
//! - A node-centered and an element-centered operand combine into an
//!   element-centered result; the node side is interpolated at each element's
//!   centroid through `Mesh::element_value`.
//!
//! Code cross-refs: `mesh::Mesh::element_value`, `dataset::Output::zeroed`

mod engine;
mod ops;

pub use engine::{CalcCfg, DatasetCalc};
pub use ops::{AggrOp, BinaryOp, UnaryOp};
