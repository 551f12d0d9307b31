//! The persistence collaborator boundary.
//!
//! The engine persists nothing itself. A `BasketStore` implementation is
//! supplied by the hosting application (HTTP client, database, ...); the
//! contract is that snapshots round-trip exactly and absent fields stay
//! omitted.

use thiserror::Error;

use crate::engine::Snapshot;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no stored values for basket '{basket}' in project '{project}'")]
    NotFound { basket: String, project: String },

    #[error("persistence backend failure: {0}")]
    Backend(String),
}

pub trait BasketStore {
    fn load(&self, basket: &str, project: &str) -> Result<Snapshot, StoreError>;
    fn save(&mut self, basket: &str, project: &str, snapshot: &Snapshot) -> Result<(), StoreError>;
}
