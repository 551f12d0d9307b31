//! Static, declarative description of the assumption baskets: fields,
//! groups, tiers, formulas, defaults.

pub mod basket;
pub mod baskets;
pub mod field;
pub mod formula;
pub mod types;

pub use basket::BasketConfig;
pub use field::{FieldDefinition, FieldGroup};
pub use formula::Calc;
pub use types::{Bounds, FieldId, FieldValue, Format, Tier, TierText, ValueType};
