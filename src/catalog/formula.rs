//! The closed formula registry.
//!
//! Every derived field names one `Calc` variant. Keeping the formulas in a
//! closed enum (rather than opaque closures in the catalogue data) means the
//! dependency graph is buildable by static inspection of `inputs()`, and a
//! formula's behavior is testable in one place.

use smallvec::{smallvec, SmallVec};

/// A field key inside the owning basket. Catalogues are static data, so
/// formulas reference their inputs by `&'static str`.
pub type Key = &'static str;

/// A pure derivation over other fields of the same basket.
///
/// Input order is significant for non-commutative shapes (`Difference`,
/// `Quotient`, ...); the resolved parent list preserves it positionally.
#[derive(Debug, Clone, PartialEq)]
pub enum Calc {
    /// Sum of all inputs.
    Sum(Vec<Key>),
    /// `minuend - subtrahend`.
    Difference(Key, Key),
    /// `a * b`.
    Product(Key, Key),
    /// `numerator / denominator`.
    Quotient(Key, Key),
    /// `base * pct / 100`.
    PercentOf { base: Key, pct: Key },
    /// `100 - pct`.
    ComplementPct(Key),
    /// `numerator / denominator * 100`, expressed as a percentage.
    RatioPct { num: Key, den: Key },
    /// Monthly amount times twelve.
    Annualize(Key),
    /// Annual amount divided by twelve.
    MonthlyFrom(Key),
    /// Calendar arithmetic: `date` plus a (possibly fractional) year count.
    DateAddYears { date: Key, years: Key },
    /// Annual debt service of a standard amortizing loan.
    LoanPayment {
        principal: Key,
        rate_pct: Key,
        term_years: Key,
    },
}

impl Calc {
    /// The keys this formula reads, in evaluation-significant order.
    /// This is the single source of truth for a field's dependency list.
    pub fn inputs(&self) -> SmallVec<[Key; 4]> {
        match self {
            Calc::Sum(keys) => keys.iter().copied().collect(),
            Calc::Difference(a, b)
            | Calc::Product(a, b)
            | Calc::Quotient(a, b)
            | Calc::PercentOf { base: a, pct: b }
            | Calc::RatioPct { num: a, den: b }
            | Calc::DateAddYears { date: a, years: b } => smallvec![*a, *b],
            Calc::ComplementPct(k) | Calc::Annualize(k) | Calc::MonthlyFrom(k) => smallvec![*k],
            Calc::LoanPayment {
                principal,
                rate_pct,
                term_years,
            } => smallvec![*principal, *rate_pct, *term_years],
        }
    }

    /// Operator symbol for audit traces. Multi-input shapes render a name.
    pub fn symbol(&self) -> &'static str {
        match self {
            Calc::Sum(_) => "+",
            Calc::Difference(..) => "-",
            Calc::Product(..) => "*",
            Calc::Quotient(..) => "/",
            Calc::PercentOf { .. } => "pct-of",
            Calc::ComplementPct(_) => "100 -",
            Calc::RatioPct { .. } => "ratio",
            Calc::Annualize(_) => "x12",
            Calc::MonthlyFrom(_) => "/12",
            Calc::DateAddYears { .. } => "+years",
            Calc::LoanPayment { .. } => "pmt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_preserve_declaration_order() {
        let c = Calc::Quotient("net_operating_income", "annual_debt_service");
        assert_eq!(
            c.inputs().as_slice(),
            ["net_operating_income", "annual_debt_service"]
        );

        let c = Calc::LoanPayment {
            principal: "loan_amount",
            rate_pct: "interest_rate_pct",
            term_years: "amortization_years",
        };
        assert_eq!(c.inputs().len(), 3);
    }
}
