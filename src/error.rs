//! Error types shared across the crate.
//!
//! Catalogue configuration problems are hard errors raised at load time.
//! Everything that can go wrong while a user is editing a basket is data
//! (`ComputationWarning`, `ValidationIssue`), never a panic or an abort.

use thiserror::Error;

use crate::catalog::ValueType;

/// A misconfigured basket catalogue. These abort loading the basket;
/// they are bugs in the static catalogue data, not runtime conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("basket '{basket}': unknown field key '{key}' referenced by {referenced_by}")]
    UnknownField {
        basket: String,
        key: String,
        referenced_by: String,
    },

    #[error("basket '{basket}': duplicate field key '{key}'")]
    DuplicateField { basket: String, key: String },

    /// The dependency graph is not acyclic. `path` lists the keys on the
    /// cycle in dependency order so the offending formulas can be found.
    #[error("basket '{basket}': dependency cycle: {}", .path.join(" -> "))]
    Cycle { basket: String, path: Vec<String> },
}

/// A fault inside a single formula evaluation. Converted by the evaluator
/// into a per-field [`ComputationWarning`]; never aborts a recompute pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("input '{key}' has the wrong type for this formula")]
    InputType { key: String },

    #[error("resulting date is out of range")]
    DateOutOfRange,

    #[error("formula produced a value incompatible with declared type {expected:?}")]
    InvalidResult { expected: ValueType },
}

/// Non-fatal report that one derived field could not be recomputed.
/// The field keeps its previous value; the caller surfaces the warning.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ComputationWarning {
    pub field: String,
    #[serde(serialize_with = "serialize_cause")]
    pub cause: CalcError,
}

fn serialize_cause<S: serde::Serializer>(c: &CalcError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&c.to_string())
}

impl std::fmt::Display for ComputationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field '{}': {}", self.field, self.cause)
    }
}
