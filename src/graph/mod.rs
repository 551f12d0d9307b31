//! Dependency graph construction and traversal.
pub mod dag;

pub use dag::DependencyGraph;
