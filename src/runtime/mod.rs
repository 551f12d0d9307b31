//! Session façade and the persistence collaborator boundary.
pub mod basket;
pub mod store;

pub use basket::{builtin, builtin_baskets, Basket, BasketRuntime, EditOutcome, RuntimeError};
pub use store::{BasketStore, StoreError};
