//! The recompute engine.
//!
//! Walks the topological evaluation order and re-derives every field that
//! carries a formula. A formula that cannot produce a value yet (missing
//! inputs) leaves the stored value untouched; a formula that faults is
//! reported as a per-field warning and never aborts the pass.

use std::collections::HashSet;

use time::{Date, Month};

use super::values::ValueMap;
use crate::catalog::{BasketConfig, Calc, FieldId, FieldValue, ValueType};
use crate::error::{CalcError, ComputationWarning};
use crate::graph::DependencyGraph;

pub struct Evaluator<'a> {
    catalog: &'a BasketConfig,
    graph: &'a DependencyGraph,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a BasketConfig, graph: &'a DependencyGraph) -> Self {
        Self { catalog, graph }
    }

    /// Recomputes every derived field of the basket, in dependency order.
    /// Pure in `(catalog, values)`: running it twice yields the same map.
    pub fn recompute(&self, values: &mut ValueMap) -> Vec<ComputationWarning> {
        self.run_pass(values, None)
    }

    /// Recomputes only the fields affected by an edit to `changed`.
    pub fn recompute_from(&self, values: &mut ValueMap, changed: FieldId) -> Vec<ComputationWarning> {
        let affected = self.graph.downstream_of(changed);
        self.run_pass(values, Some(&affected))
    }

    fn run_pass(&self, values: &mut ValueMap, only: Option<&HashSet<FieldId>>) -> Vec<ComputationWarning> {
        let mut warnings = Vec::new();

        for &id in self.graph.evaluation_order() {
            if let Some(scope) = only {
                if !scope.contains(&id) {
                    continue;
                }
            }
            let field = self.catalog.field(id);
            let calc = match &field.calc {
                Some(c) => c,
                None => continue, // plain input, never touched here
            };

            match self.evaluate(id, calc, values) {
                // Best-effort derivation: a null result is "not yet
                // computable" and must not clear what is already stored.
                Ok(None) => {}
                Ok(Some(value)) => values.set(id, value),
                Err(cause) => {
                    tracing::warn!(
                        basket = self.catalog.basket_id(),
                        field = field.key,
                        %cause,
                        "formula fault; keeping previous value"
                    );
                    warnings.push(ComputationWarning {
                        field: field.key.to_string(),
                        cause,
                    });
                }
            }
        }
        warnings
    }

    fn evaluate(
        &self,
        id: FieldId,
        calc: &Calc,
        values: &ValueMap,
    ) -> Result<Option<FieldValue>, CalcError> {
        let parents = self.catalog.parents(id);
        let declared = self.catalog.field(id).value_type;

        // Numeric input by position in the formula's declared input order.
        // Absent -> the whole derivation is "not yet computable".
        let num = |slot: usize| -> Result<Option<f64>, CalcError> {
            let pid = parents[slot];
            match values.get(pid) {
                None => Ok(None),
                Some(v) => v.as_number().map(Some).ok_or_else(|| CalcError::InputType {
                    key: self.catalog.field(pid).key.to_string(),
                }),
            }
        };

        let result = match calc {
            Calc::Sum(_) => {
                let mut total = 0.0;
                for slot in 0..parents.len() {
                    match num(slot)? {
                        Some(v) => total += v,
                        None => return Ok(None),
                    }
                }
                total
            }
            Calc::Difference(..) => match (num(0)?, num(1)?) {
                (Some(a), Some(b)) => a - b,
                _ => return Ok(None),
            },
            Calc::Product(..) => match (num(0)?, num(1)?) {
                (Some(a), Some(b)) => a * b,
                _ => return Ok(None),
            },
            Calc::Quotient(..) => match (num(0)?, num(1)?) {
                (Some(_), Some(den)) if den == 0.0 => return Err(CalcError::DivisionByZero),
                (Some(n), Some(den)) => n / den,
                _ => return Ok(None),
            },
            Calc::PercentOf { .. } => match (num(0)?, num(1)?) {
                (Some(base), Some(pct)) => base * pct / 100.0,
                _ => return Ok(None),
            },
            Calc::ComplementPct(_) => match num(0)? {
                Some(pct) => 100.0 - pct,
                None => return Ok(None),
            },
            Calc::RatioPct { .. } => match (num(0)?, num(1)?) {
                (Some(_), Some(den)) if den == 0.0 => return Err(CalcError::DivisionByZero),
                (Some(n), Some(den)) => n / den * 100.0,
                _ => return Ok(None),
            },
            Calc::Annualize(_) => match num(0)? {
                Some(v) => v * 12.0,
                None => return Ok(None),
            },
            Calc::MonthlyFrom(_) => match num(0)? {
                Some(v) => v / 12.0,
                None => return Ok(None),
            },
            Calc::LoanPayment { .. } => {
                match (num(0)?, num(1)?, num(2)?) {
                    (Some(principal), Some(rate_pct), Some(term_years)) => {
                        annual_debt_service(principal, rate_pct, term_years)?
                    }
                    _ => return Ok(None),
                }
            }
            Calc::DateAddYears { .. } => {
                let date = match values.get(parents[0]) {
                    None => return Ok(None),
                    Some(v) => v.as_date().ok_or_else(|| CalcError::InputType {
                        key: self.catalog.field(parents[0]).key.to_string(),
                    })?,
                };
                let years = match num(1)? {
                    Some(y) => y,
                    None => return Ok(None),
                };
                let shifted = date_add_years(date, years)?;
                if declared != ValueType::Date {
                    return Err(CalcError::InvalidResult { expected: declared });
                }
                return Ok(Some(FieldValue::Date(shifted)));
            }
        };

        if !result.is_finite() {
            return Err(CalcError::NonFinite);
        }
        FieldValue::from_number(declared, result)
            .map(Some)
            .ok_or(CalcError::InvalidResult { expected: declared })
    }
}

/// Payment on a standard amortizing loan, expressed per year.
/// Zero-rate loans degrade to straight-line principal repayment.
fn annual_debt_service(principal: f64, rate_pct: f64, term_years: f64) -> Result<f64, CalcError> {
    let n = term_years * 12.0;
    if n <= 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    let r = rate_pct / 100.0 / 12.0;
    let monthly = if r == 0.0 {
        principal / n
    } else {
        principal * r / (1.0 - (1.0 + r).powf(-n))
    };
    Ok(monthly * 12.0)
}

/// Shifts a date by a possibly fractional number of years (fraction rounds
/// to whole months). Day-of-month clamps to the target month's length.
fn date_add_years(date: Date, years: f64) -> Result<Date, CalcError> {
    let whole_months = (years * 12.0).round() as i64;
    let base = date.year() as i64 * 12 + (date.month() as i64 - 1);
    let target = base + whole_months;

    let year = target.div_euclid(12);
    let month = Month::try_from((target.rem_euclid(12) + 1) as u8)
        .map_err(|_| CalcError::DateOutOfRange)?;
    let year = i32::try_from(year).map_err(|_| CalcError::DateOutOfRange)?;

    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).map_err(|_| CalcError::DateOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDefinition, Tier};
    use time::macros::date;

    fn fixture() -> (BasketConfig, DependencyGraph) {
        let catalog = BasketConfig::new(
            "t",
            "Test",
            vec![],
            vec![
                FieldDefinition::input("price", "Price", ValueType::Currency, Tier::Napkin),
                FieldDefinition::input("units", "Units", ValueType::Number, Tier::Napkin),
                FieldDefinition::input("land_pct", "Land %", ValueType::Percentage, Tier::Napkin),
                FieldDefinition::derived(
                    "improvement_pct",
                    "Improvement %",
                    ValueType::Percentage,
                    Tier::Napkin,
                    Calc::ComplementPct("land_pct"),
                ),
                FieldDefinition::derived(
                    "basis",
                    "Basis",
                    ValueType::Currency,
                    Tier::Napkin,
                    Calc::PercentOf { base: "price", pct: "improvement_pct" },
                ),
                FieldDefinition::derived(
                    "per_unit",
                    "Per Unit",
                    ValueType::Currency,
                    Tier::Napkin,
                    Calc::Quotient("price", "units"),
                ),
            ],
        )
        .unwrap();
        let graph = DependencyGraph::build(&catalog).unwrap();
        (catalog, graph)
    }

    #[test]
    fn chained_derivations_settle_in_one_pass() {
        let (catalog, graph) = fixture();
        let mut values = ValueMap::new(&catalog);
        values.set(catalog.id_of("price").unwrap(), FieldValue::Currency(1_000_000.0));
        values.set(catalog.id_of("land_pct").unwrap(), FieldValue::Percentage(20.0));

        let warnings = Evaluator::new(&catalog, &graph).recompute(&mut values);
        assert!(warnings.is_empty());
        assert_eq!(
            values.get(catalog.id_of("improvement_pct").unwrap()),
            Some(&FieldValue::Percentage(80.0))
        );
        assert_eq!(
            values.get(catalog.id_of("basis").unwrap()),
            Some(&FieldValue::Currency(800_000.0))
        );
    }

    #[test]
    fn recompute_is_idempotent() {
        let (catalog, graph) = fixture();
        let mut values = ValueMap::new(&catalog);
        values.set(catalog.id_of("price").unwrap(), FieldValue::Currency(1_000_000.0));
        values.set(catalog.id_of("units").unwrap(), FieldValue::Number(40.0));
        values.set(catalog.id_of("land_pct").unwrap(), FieldValue::Percentage(25.0));

        let eval = Evaluator::new(&catalog, &graph);
        eval.recompute(&mut values);
        let first = values.clone();
        eval.recompute(&mut values);
        assert_eq!(values, first);
    }

    #[test]
    fn missing_input_leaves_derived_field_absent() {
        let (catalog, graph) = fixture();
        let mut values = ValueMap::new(&catalog);
        values.set(catalog.id_of("price").unwrap(), FieldValue::Currency(5_000_000.0));

        let warnings = Evaluator::new(&catalog, &graph).recompute(&mut values);
        assert!(warnings.is_empty());
        // units absent: per-unit must stay absent, not become zero.
        assert!(values.is_absent(catalog.id_of("per_unit").unwrap()));
    }

    #[test]
    fn faulting_formula_warns_and_keeps_stale_value() {
        let (catalog, graph) = fixture();
        let per_unit = catalog.id_of("per_unit").unwrap();
        let mut values = ValueMap::new(&catalog);
        values.set(catalog.id_of("price").unwrap(), FieldValue::Currency(1_000_000.0));
        values.set(catalog.id_of("units").unwrap(), FieldValue::Number(40.0));

        let eval = Evaluator::new(&catalog, &graph);
        eval.recompute(&mut values);
        assert_eq!(values.get(per_unit), Some(&FieldValue::Currency(25_000.0)));

        // Division by zero: the field keeps its last known value.
        values.set(catalog.id_of("units").unwrap(), FieldValue::Number(0.0));
        let warnings = eval.recompute(&mut values);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "per_unit");
        assert_eq!(warnings[0].cause, CalcError::DivisionByZero);
        assert_eq!(values.get(per_unit), Some(&FieldValue::Currency(25_000.0)));
    }

    #[test]
    fn wrongly_typed_input_warns_instead_of_aborting() {
        let (catalog, graph) = fixture();
        let mut values = ValueMap::new(&catalog);
        values.set(catalog.id_of("price").unwrap(), FieldValue::Currency(1_000_000.0));
        values.set(catalog.id_of("units").unwrap(), FieldValue::Text("forty".into()));
        values.set(catalog.id_of("land_pct").unwrap(), FieldValue::Percentage(20.0));

        let warnings = Evaluator::new(&catalog, &graph).recompute(&mut values);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0].cause, CalcError::InputType { .. }));
        // Unrelated derivations still ran.
        assert_eq!(
            values.get(catalog.id_of("basis").unwrap()),
            Some(&FieldValue::Currency(800_000.0))
        );
    }

    #[test]
    fn incremental_recompute_matches_full_pass() {
        let (catalog, graph) = fixture();
        let eval = Evaluator::new(&catalog, &graph);

        let mut values = ValueMap::new(&catalog);
        values.set(catalog.id_of("price").unwrap(), FieldValue::Currency(1_000_000.0));
        values.set(catalog.id_of("units").unwrap(), FieldValue::Number(40.0));
        values.set(catalog.id_of("land_pct").unwrap(), FieldValue::Percentage(20.0));
        eval.recompute(&mut values);

        let land = catalog.id_of("land_pct").unwrap();
        values.set(land, FieldValue::Percentage(30.0));

        let mut incremental = values.clone();
        eval.recompute_from(&mut incremental, land);

        let mut full = values.clone();
        eval.recompute(&mut full);

        assert_eq!(incremental, full);
        assert_eq!(
            incremental.get(catalog.id_of("basis").unwrap()),
            Some(&FieldValue::Currency(700_000.0))
        );
    }

    #[test]
    fn date_add_years_handles_leap_day_clamp() {
        assert_eq!(
            date_add_years(date!(2024 - 02 - 29), 1.0).unwrap(),
            date!(2025 - 02 - 28)
        );
        assert_eq!(
            date_add_years(date!(2025 - 01 - 15), 5.0).unwrap(),
            date!(2030 - 01 - 15)
        );
        // Fractional years round to whole months.
        assert_eq!(
            date_add_years(date!(2025 - 01 - 31), 0.5).unwrap(),
            date!(2025 - 07 - 31)
        );
    }

    #[test]
    fn zero_rate_loan_degrades_to_straight_line() {
        let annual = annual_debt_service(1_200_000.0, 0.0, 10.0).unwrap();
        assert!((annual - 120_000.0).abs() < 1e-9);
    }

    #[test]
    fn loan_payment_matches_standard_amortization() {
        // $1,000,000 at 6% for 30 years: monthly payment 5,995.51.
        let annual = annual_debt_service(1_000_000.0, 6.0, 30.0).unwrap();
        assert!((annual / 12.0 - 5995.505).abs() < 0.01, "got {}", annual / 12.0);
    }
}
