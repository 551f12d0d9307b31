//! Advisory constraint checking over a basket's value map.
pub mod validator;

pub use validator::{validate, IssueKind, ValidationIssue};
