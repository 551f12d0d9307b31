//! Core computation engine for the underwriting assumption forms.
//!
//! A basket is a catalogue of named, tiered fields, some entered and some
//! derived by pure formulas over sibling fields. This crate owns the
//! dependency graph, the recompute engine, validation, tier projection,
//! and the stepped growth-rate schedule calculator. It performs no I/O;
//! persistence and presentation are collaborators behind small seams
//! ([`runtime::BasketStore`] and the snapshot types).

pub mod catalog;
pub mod engine;
pub mod error;
pub mod graph;
pub mod runtime;
pub mod schedule;
pub mod tier;
pub mod validation;

pub use catalog::{BasketConfig, Calc, FieldDefinition, FieldGroup, FieldId, FieldValue, Tier, ValueType};
pub use engine::{format_trace, Evaluator, Snapshot, ValueMap};
pub use error::{CalcError, CatalogError, ComputationWarning};
pub use graph::DependencyGraph;
pub use runtime::{builtin, builtin_baskets, Basket, BasketRuntime, BasketStore, EditOutcome, RuntimeError, StoreError};
pub use schedule::{parse_rate, ComputedStep, PeriodBound, ScheduleConfig, ScheduleTrack, Step, TrackIssue};
pub use tier::{visible_fields, visible_groups, VisibleGroup};
pub use validation::{validate, IssueKind, ValidationIssue};
