//! The five production basket catalogues.
//!
//! Each basket is pure static data: fields, groups, tiers, defaults, and
//! formulas. Cross-basket references are deliberately absent; a value
//! another basket derives (e.g. net operating income inside The Debt) is
//! modeled as a plain input the UI carries over.

pub mod cash_in;
pub mod cash_out;
pub mod deal;
pub mod equity;
pub mod financing;

use super::BasketConfig;
use crate::error::CatalogError;

/// Every production basket, in display order.
pub fn all() -> Vec<Result<BasketConfig, CatalogError>> {
    vec![
        deal::the_deal(),
        cash_in::cash_in(),
        cash_out::cash_out(),
        financing::financing(),
        equity::equity(),
    ]
}
