//! The indexed catalogue for one basket.
//!
//! Construction resolves every formula input and group member to a dense
//! [`FieldId`], failing fast on unknown or duplicate keys. After
//! construction the catalogue is immutable, process-wide static data.

use std::collections::HashMap;

use smallvec::SmallVec;

use super::field::{FieldDefinition, FieldGroup};
use super::types::{FieldId, Tier};
use crate::error::CatalogError;

#[derive(Debug, Clone)]
pub struct BasketConfig {
    basket_id: &'static str,
    title: &'static str,
    groups: Vec<FieldGroup>,
    fields: Vec<FieldDefinition>,

    // Resolved topology, parallel to `fields` (declaration order).
    parents: Vec<SmallVec<[FieldId; 4]>>,
    by_key: HashMap<&'static str, FieldId>,
}

impl BasketConfig {
    pub fn new(
        basket_id: &'static str,
        title: &'static str,
        groups: Vec<FieldGroup>,
        fields: Vec<FieldDefinition>,
    ) -> Result<Self, CatalogError> {
        // 1. Key index, rejecting duplicates.
        let mut by_key = HashMap::with_capacity(fields.len());
        for (i, f) in fields.iter().enumerate() {
            if by_key.insert(f.key, FieldId::new(i)).is_some() {
                return Err(CatalogError::DuplicateField {
                    basket: basket_id.to_string(),
                    key: f.key.to_string(),
                });
            }
        }

        let resolve = |key: &str, referenced_by: String| -> Result<FieldId, CatalogError> {
            by_key
                .get(key)
                .copied()
                .ok_or_else(|| CatalogError::UnknownField {
                    basket: basket_id.to_string(),
                    key: key.to_string(),
                    referenced_by,
                })
        };

        // 2. Resolve formula inputs into per-field parent lists.
        let mut parents = Vec::with_capacity(fields.len());
        for f in &fields {
            let mut list: SmallVec<[FieldId; 4]> = SmallVec::new();
            if let Some(calc) = &f.calc {
                for input in calc.inputs() {
                    list.push(resolve(input, format!("field '{}'", f.key))?);
                }
            }
            parents.push(list);
        }

        // 3. Resolve group members.
        for g in &groups {
            for &member in &g.members {
                resolve(member, format!("group '{}'", g.key))?;
            }
        }

        Ok(Self {
            basket_id,
            title,
            groups,
            fields,
            parents,
            by_key,
        })
    }

    pub fn basket_id(&self) -> &'static str {
        self.basket_id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline(always)]
    pub fn field(&self, id: FieldId) -> &FieldDefinition {
        &self.fields[id.index()]
    }

    /// All fields in declaration order (which is also display order).
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    #[inline(always)]
    pub fn parents(&self, id: FieldId) -> &[FieldId] {
        &self.parents[id.index()]
    }

    pub fn id_of(&self, key: &str) -> Result<FieldId, CatalogError> {
        self.by_key
            .get(key)
            .copied()
            .ok_or_else(|| CatalogError::UnknownField {
                basket: self.basket_id.to_string(),
                key: key.to_string(),
                referenced_by: "caller".to_string(),
            })
    }

    pub fn field_by_key(&self, key: &str) -> Result<&FieldDefinition, CatalogError> {
        Ok(self.field(self.id_of(key)?))
    }

    /// All fields visible at `tier`, preserving declaration order.
    pub fn fields_for_tier(&self, tier: Tier) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(move |f| f.tier <= tier)
    }

    /// Resolved member ids of a group, in the group's declared order.
    pub fn group_members(&self, group: &FieldGroup) -> Vec<FieldId> {
        group
            .members
            .iter()
            .map(|m| self.by_key[m])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::formula::Calc;
    use crate::catalog::types::ValueType;

    fn input(key: &'static str) -> FieldDefinition {
        FieldDefinition::input(key, key, ValueType::Number, Tier::Napkin)
    }

    #[test]
    fn resolves_formula_inputs_in_order() {
        let basket = BasketConfig::new(
            "t",
            "Test",
            vec![],
            vec![
                input("a"),
                input("b"),
                FieldDefinition::derived("c", "c", ValueType::Number, Tier::Napkin, Calc::Difference("b", "a")),
            ],
        )
        .unwrap();

        let c = basket.id_of("c").unwrap();
        assert_eq!(basket.parents(c), [basket.id_of("b").unwrap(), basket.id_of("a").unwrap()]);
    }

    #[test]
    fn unknown_formula_input_fails_fast() {
        let err = BasketConfig::new(
            "t",
            "Test",
            vec![],
            vec![FieldDefinition::derived(
                "c",
                "c",
                ValueType::Number,
                Tier::Napkin,
                Calc::Annualize("missing"),
            )],
        )
        .unwrap_err();

        match err {
            CatalogError::UnknownField { key, referenced_by, .. } => {
                assert_eq!(key, "missing");
                assert_eq!(referenced_by, "field 'c'");
            }
            other => panic!("expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn unknown_group_member_fails_fast() {
        let err = BasketConfig::new(
            "t",
            "Test",
            vec![FieldGroup::new("g", "G", Tier::Napkin, &["ghost"])],
            vec![input("a")],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownField { .. }));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = BasketConfig::new("t", "Test", vec![], vec![input("a"), input("a")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateField { .. }));
    }
}
