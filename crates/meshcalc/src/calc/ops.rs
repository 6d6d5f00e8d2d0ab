//! Operator tables for the three traversal routines.
//!
//! Each enum names the per-location function; `FromStr` accepts the
//! snake_case names listed in `ALL`. Sentinel handling is done by the
//! traversal, so `apply` sees real values only. Floating-point edge cases
//! (division by zero, NaN from `power`) pass through unchanged.

use std::str::FromStr;

use crate::dataset::NODATA;
use crate::error::CalcError;

#[inline]
fn truth(v: f64) -> bool {
    v != 0.0
}

#[inline]
fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Elementwise function of one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    LogicalNot,
    ChangeSign,
    Abs,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 3] = [UnaryOp::LogicalNot, UnaryOp::ChangeSign, UnaryOp::Abs];

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::LogicalNot => "logical_not",
            UnaryOp::ChangeSign => "change_sign",
            UnaryOp::Abs => "abs",
        }
    }

    #[inline]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            UnaryOp::LogicalNot => flag(!truth(v)),
            UnaryOp::ChangeSign => -v,
            UnaryOp::Abs => v.abs(),
        }
    }
}

/// Elementwise function of two values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// First value where the second is true (non-zero), else the sentinel.
    Filter,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Equal,
    NotEqual,
    GreaterThan,
    LesserThan,
    LesserEqual,
    LogicalAnd,
    LogicalOr,
    Min,
    Max,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 15] = [
        BinaryOp::Filter,
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::Multiply,
        BinaryOp::Divide,
        BinaryOp::Power,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::GreaterThan,
        BinaryOp::LesserThan,
        BinaryOp::LesserEqual,
        BinaryOp::LogicalAnd,
        BinaryOp::LogicalOr,
        BinaryOp::Min,
        BinaryOp::Max,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Filter => "filter",
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Power => "power",
            BinaryOp::Equal => "equal",
            BinaryOp::NotEqual => "not_equal",
            BinaryOp::GreaterThan => "greater_than",
            BinaryOp::LesserThan => "lesser_than",
            BinaryOp::LesserEqual => "lesser_equal",
            BinaryOp::LogicalAnd => "logical_and",
            BinaryOp::LogicalOr => "logical_or",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
        }
    }

    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Filter => {
                if truth(b) {
                    a
                } else {
                    NODATA
                }
            }
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
            BinaryOp::Power => a.powf(b),
            BinaryOp::Equal => flag(a == b),
            BinaryOp::NotEqual => flag(a != b),
            BinaryOp::GreaterThan => flag(a > b),
            BinaryOp::LesserThan => flag(a < b),
            BinaryOp::LesserEqual => flag(a <= b),
            BinaryOp::LogicalAnd => flag(truth(a) && truth(b)),
            BinaryOp::LogicalOr => flag(truth(a) || truth(b)),
            BinaryOp::Min => a.min(b),
            BinaryOp::Max => a.max(b),
        }
    }
}

/// Reduction of one location's non-sentinel values over all time steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggrOp {
    Sum,
    Min,
    Max,
    Average,
}

impl AggrOp {
    pub const ALL: [AggrOp; 4] = [AggrOp::Sum, AggrOp::Min, AggrOp::Max, AggrOp::Average];

    pub fn name(self) -> &'static str {
        match self {
            AggrOp::Sum => "sum_aggr",
            AggrOp::Min => "min_aggr",
            AggrOp::Max => "max_aggr",
            AggrOp::Average => "avg_aggr",
        }
    }

    /// Pre: `vals` is non-empty (the traversal emits the sentinel otherwise).
    pub fn apply(self, vals: &[f64]) -> f64 {
        debug_assert!(!vals.is_empty(), "aggregate of an empty sequence");
        match self {
            AggrOp::Sum => vals.iter().sum(),
            AggrOp::Min => vals.iter().copied().fold(f64::INFINITY, f64::min),
            AggrOp::Max => vals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            AggrOp::Average => vals.iter().sum::<f64>() / vals.len() as f64,
        }
    }
}

macro_rules! impl_from_str {
    ($($op:ty),*) => {$(
        impl FromStr for $op {
            type Err = CalcError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$op>::ALL
                    .into_iter()
                    .find(|op| op.name() == s)
                    .ok_or_else(|| CalcError::UnknownOperator(s.to_string()))
            }
        }
    )*};
}

impl_from_str!(UnaryOp, BinaryOp, AggrOp);
