//! The per-session façade the UI and API layers call.
//!
//! One `BasketRuntime` owns the value map for one basket of one project.
//! `set_field`/`clear_field` are the only mutation paths; each edit runs
//! an incremental recompute and re-validates before returning, so callers
//! always see a fully settled snapshot.

use once_cell::sync::Lazy;

use crate::catalog::{baskets, BasketConfig, FieldValue, Tier};
use crate::engine::{format_trace, Evaluator, Snapshot, ValueMap};
use crate::error::{CatalogError, ComputationWarning};
use crate::graph::DependencyGraph;
use crate::validation::{validate, ValidationIssue};

use super::store::{BasketStore, StoreError};
use thiserror::Error;

/// A catalogue paired with its built dependency graph.
#[derive(Debug, Clone)]
pub struct Basket {
    config: BasketConfig,
    graph: DependencyGraph,
}

impl Basket {
    pub fn new(config: BasketConfig) -> Result<Self, CatalogError> {
        let graph = DependencyGraph::build(&config)?;
        Ok(Self { config, graph })
    }

    pub fn config(&self) -> &BasketConfig {
        &self.config
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

/// The five production baskets, built and cycle-checked once per process.
/// A configuration error here is a bug in static catalogue data; the
/// regression tests in `catalog::baskets` cover every entry.
static BUILTIN: Lazy<Vec<Basket>> = Lazy::new(|| {
    baskets::all()
        .into_iter()
        .map(|r| {
            let config = r.expect("BUG: built-in basket catalogue failed to build");
            tracing::info!(basket = config.basket_id(), fields = config.len(), "loaded basket catalogue");
            Basket::new(config).expect("BUG: built-in basket catalogue has a dependency cycle")
        })
        .collect()
});

pub fn builtin_baskets() -> &'static [Basket] {
    &BUILTIN
}

pub fn builtin(basket_id: &str) -> Option<&'static Basket> {
    BUILTIN.iter().find(|b| b.config.basket_id() == basket_id)
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("save blocked by {} validation issue(s)", .issues.len())]
    SaveBlocked { issues: Vec<ValidationIssue> },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a single edit produced: the settled snapshot, any formula faults,
/// and the validation state at the session's tier.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub values: Snapshot,
    pub warnings: Vec<ComputationWarning>,
    pub issues: Vec<ValidationIssue>,
}

pub struct BasketRuntime<'a> {
    basket: &'a Basket,
    project: String,
    tier: Tier,
    values: ValueMap,
}

impl<'a> BasketRuntime<'a> {
    /// Opens an edit session: loads the stored snapshot (a missing record
    /// starts empty), seeds declared defaults into empty input slots, and
    /// settles all derived fields.
    pub fn open(
        basket: &'a Basket,
        store: &dyn BasketStore,
        project: &str,
        tier: Tier,
    ) -> Result<Self, RuntimeError> {
        let catalog = basket.config();
        let snapshot = match store.load(catalog.basket_id(), project) {
            Ok(snap) => snap,
            Err(StoreError::NotFound { .. }) => Snapshot::new(),
            Err(e) => return Err(e.into()),
        };

        let mut values = ValueMap::from_snapshot(catalog, &snapshot);
        for (i, field) in catalog.fields().iter().enumerate() {
            if let Some(default) = &field.default {
                let id = crate::catalog::FieldId::new(i);
                if field.is_input() && values.is_absent(id) {
                    values.set(id, default.clone());
                }
            }
        }

        let mut runtime = Self {
            basket,
            project: project.to_string(),
            tier,
            values,
        };
        let warnings = runtime.evaluator().recompute(&mut runtime.values);
        if !warnings.is_empty() {
            tracing::warn!(
                basket = catalog.basket_id(),
                project,
                count = warnings.len(),
                "formula warnings while opening basket"
            );
        }
        Ok(runtime)
    }

    fn evaluator(&self) -> Evaluator<'a> {
        Evaluator::new(self.basket.config(), self.basket.graph())
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Switches the disclosure tier; validation state changes, values do not.
    pub fn set_tier(&mut self, tier: Tier) -> Vec<ValidationIssue> {
        self.tier = tier;
        self.validate()
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn snapshot(&self) -> Snapshot {
        self.values.to_snapshot(self.basket.config())
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate(self.basket.config(), &self.values, self.tier)
    }

    /// The single mutation entry point. Writes the value, re-derives every
    /// affected field, then validates the settled snapshot.
    pub fn set_field(&mut self, key: &str, value: FieldValue) -> Result<EditOutcome, CatalogError> {
        let id = self.basket.config().id_of(key)?;
        tracing::debug!(basket = self.basket.config().basket_id(), key, "set_field");
        self.values.set(id, value);
        let warnings = self.evaluator().recompute_from(&mut self.values, id);
        Ok(self.outcome(warnings))
    }

    /// Clears a user-entered value and re-derives, same pipeline as a write.
    pub fn clear_field(&mut self, key: &str) -> Result<EditOutcome, CatalogError> {
        let id = self.basket.config().id_of(key)?;
        self.values.clear(id);
        let warnings = self.evaluator().recompute_from(&mut self.values, id);
        Ok(self.outcome(warnings))
    }

    fn outcome(&self, warnings: Vec<ComputationWarning>) -> EditOutcome {
        EditOutcome {
            values: self.snapshot(),
            warnings,
            issues: self.validate(),
        }
    }

    /// Renders the derivation tree for one field at its current value.
    pub fn explain(&self, key: &str) -> Result<String, CatalogError> {
        format_trace(self.basket.config(), &self.values, key)
    }

    /// Persists the current snapshot, unless a blocking validation issue
    /// exists at the session tier. Soft issues (out-of-range) do not block.
    /// A store failure leaves the in-memory values untouched.
    pub fn save(&self, store: &mut dyn BasketStore) -> Result<(), RuntimeError> {
        let blocking: Vec<ValidationIssue> = self
            .validate()
            .into_iter()
            .filter(|i| i.blocks_save())
            .collect();
        if !blocking.is_empty() {
            return Err(RuntimeError::SaveBlocked { issues: blocking });
        }

        let catalog = self.basket.config();
        store.save(catalog.basket_id(), &self.project, &self.snapshot())?;
        tracing::debug!(basket = catalog.basket_id(), project = %self.project, "saved basket");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IssueKind;
    use std::collections::HashMap;
    use time::macros::date;

    /// In-memory stand-in for the persistence collaborator.
    #[derive(Default)]
    struct MemoryStore {
        records: HashMap<(String, String), Snapshot>,
        save_calls: usize,
        fail_next_save: bool,
    }

    impl BasketStore for MemoryStore {
        fn load(&self, basket: &str, project: &str) -> Result<Snapshot, StoreError> {
            self.records
                .get(&(basket.to_string(), project.to_string()))
                .cloned()
                .ok_or_else(|| StoreError::NotFound {
                    basket: basket.to_string(),
                    project: project.to_string(),
                })
        }

        fn save(&mut self, basket: &str, project: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
            self.save_calls += 1;
            if self.fail_next_save {
                return Err(StoreError::Backend("write timed out".into()));
            }
            self.records
                .insert((basket.to_string(), project.to_string()), snapshot.clone());
            Ok(())
        }
    }

    fn deal() -> &'static Basket {
        builtin("the_deal").expect("the_deal basket exists")
    }

    #[test]
    fn open_seeds_defaults_without_overwriting_stored_values() {
        let mut store = MemoryStore::default();
        let mut stored = Snapshot::new();
        stored.insert("land_pct".into(), FieldValue::Percentage(35.0));
        store
            .records
            .insert(("the_deal".into(), "p1".into()), stored);

        let rt = BasketRuntime::open(deal(), &store, "p1", Tier::Mid).unwrap();
        let snap = rt.snapshot();
        // Stored value wins over the catalogue default of 20.
        assert_eq!(snap.get("land_pct"), Some(&FieldValue::Percentage(35.0)));
        // An untouched default seeds (and derives its complement).
        assert_eq!(
            snap.get("improvement_pct"),
            Some(&FieldValue::Percentage(65.0))
        );
    }

    #[test]
    fn set_field_settles_derived_fields_before_returning() {
        let store = MemoryStore::default();
        let mut rt = BasketRuntime::open(deal(), &store, "p1", Tier::Mid).unwrap();

        rt.set_field("purchase_price", FieldValue::Currency(1_000_000.0))
            .unwrap();
        let outcome = rt
            .set_field("land_pct", FieldValue::Percentage(20.0))
            .unwrap();

        assert_eq!(
            outcome.values.get("depreciation_basis"),
            Some(&FieldValue::Currency(800_000.0))
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn save_blocks_on_missing_required_napkin_field() {
        let mut store = MemoryStore::default();
        let rt = BasketRuntime::open(deal(), &store, "p1", Tier::Napkin).unwrap();

        let err = rt.save(&mut store).unwrap_err();
        match err {
            RuntimeError::SaveBlocked { issues } => {
                assert!(issues
                    .iter()
                    .any(|i| i.kind == IssueKind::MissingRequiredValue));
            }
            other => panic!("expected SaveBlocked, got {:?}", other),
        }
        // The collaborator must not have been called at all.
        assert_eq!(store.save_calls, 0);
    }

    fn fill_required(rt: &mut BasketRuntime<'_>) {
        rt.set_field("purchase_price", FieldValue::Currency(1_000_000.0))
            .unwrap();
        rt.set_field("unit_count", FieldValue::Number(40.0)).unwrap();
        rt.set_field("acquisition_date", FieldValue::Date(date!(2025 - 01 - 15)))
            .unwrap();
        rt.set_field("hold_period_years", FieldValue::Number(5.0))
            .unwrap();
    }

    #[test]
    fn save_succeeds_with_out_of_range_value() {
        let mut store = MemoryStore::default();
        let mut rt = BasketRuntime::open(deal(), &store, "p1", Tier::Napkin).unwrap();
        fill_required(&mut rt);
        // Out of declared range, but range violations are soft.
        rt.set_field("hold_period_years", FieldValue::Number(75.0))
            .unwrap();

        rt.save(&mut store).unwrap();
        assert_eq!(store.save_calls, 1);
        assert!(store
            .records
            .contains_key(&("the_deal".into(), "p1".into())));
    }

    #[test]
    fn failed_save_leaves_in_memory_values_untouched() {
        let mut store = MemoryStore::default();
        store.fail_next_save = true;
        let mut rt = BasketRuntime::open(deal(), &store, "p1", Tier::Napkin).unwrap();
        fill_required(&mut rt);

        let before = rt.snapshot();
        let err = rt.save(&mut store).unwrap_err();
        assert!(matches!(err, RuntimeError::Store(StoreError::Backend(_))));
        assert_eq!(rt.snapshot(), before);
    }

    #[test]
    fn clear_field_reverts_to_not_yet_computable() {
        let store = MemoryStore::default();
        let mut rt = BasketRuntime::open(deal(), &store, "p1", Tier::Napkin).unwrap();
        fill_required(&mut rt);
        assert!(rt.snapshot().contains_key("price_per_unit"));

        let outcome = rt.clear_field("unit_count").unwrap();
        // price_per_unit keeps its last derived value (best-effort policy);
        // the cleared input itself is gone from the snapshot.
        assert!(!outcome.values.contains_key("unit_count"));
        assert!(outcome
            .issues
            .iter()
            .any(|i| i.field == "unit_count" && i.kind == IssueKind::MissingRequiredValue));
    }

    #[test]
    fn tier_switch_revalidates_without_recomputing() {
        let store = MemoryStore::default();
        let mut rt = BasketRuntime::open(deal(), &store, "p1", Tier::Napkin).unwrap();
        fill_required(&mut rt);
        let before = rt.snapshot();

        let issues = rt.set_tier(Tier::Pro);
        assert_eq!(rt.snapshot(), before);
        // No pro-tier field in the deal basket is required, so no new blockers.
        assert!(issues.iter().all(|i| !i.blocks_save()));
    }

    #[test]
    fn explain_renders_for_a_derived_field() {
        let store = MemoryStore::default();
        let mut rt = BasketRuntime::open(deal(), &store, "p1", Tier::Napkin).unwrap();
        fill_required(&mut rt);
        let trace = rt.explain("price_per_unit").unwrap();
        assert!(trace.contains("price_per_unit"));
        assert!(trace.contains("purchase_price"));
    }
}
