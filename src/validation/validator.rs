//! Per-field constraint checking.
//!
//! Validation is advisory: it reads a value map and reports issues as data.
//! It never mutates values and never throws; the caller decides which
//! issue kinds block a save.

use serde::Serialize;

use crate::catalog::{BasketConfig, Tier};
use crate::engine::ValueMap;
use crate::tier::visible_fields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingRequiredValue,
    OutOfRange,
    TypeMismatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    /// Range violations are soft (the form is permissive around edge
    /// values); a missing required input or a type error blocks a save.
    pub fn blocks_save(&self) -> bool {
        matches!(self.kind, IssueKind::MissingRequiredValue | IssueKind::TypeMismatch)
    }
}

/// Checks every field visible at `tier` against its declared constraints.
/// Hidden fields' constraints are dormant.
pub fn validate(catalog: &BasketConfig, values: &ValueMap, tier: Tier) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for field in visible_fields(catalog, tier) {
        let id = catalog
            .id_of(field.key)
            .expect("BUG: visible field must resolve in its own catalogue");
        let label = field.label.get(tier).unwrap_or(field.key);

        let value = match values.get(id) {
            None => {
                if field.required {
                    issues.push(ValidationIssue {
                        field: field.key.to_string(),
                        kind: IssueKind::MissingRequiredValue,
                        message: format!("{} is required", label),
                    });
                }
                continue;
            }
            Some(v) => v,
        };

        if !value.matches_type(field.value_type) {
            issues.push(ValidationIssue {
                field: field.key.to_string(),
                kind: IssueKind::TypeMismatch,
                message: format!("{} must be a {:?} value", label, field.value_type),
            });
            continue;
        }

        if let (Some(bounds), Some(n)) = (field.bounds, value.as_number()) {
            if !bounds.contains(n) {
                issues.push(ValidationIssue {
                    field: field.key.to_string(),
                    kind: IssueKind::OutOfRange,
                    message: format!(
                        "{} must be between {} and {}",
                        label, bounds.min, bounds.max
                    ),
                });
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDefinition, FieldValue, ValueType};

    fn catalog() -> BasketConfig {
        BasketConfig::new(
            "t",
            "Test",
            vec![],
            vec![
                FieldDefinition::input("price", "Purchase Price", ValueType::Currency, Tier::Napkin)
                    .required(),
                FieldDefinition::input("vacancy", "Vacancy", ValueType::Percentage, Tier::Mid)
                    .required()
                    .bounds(0.0, 100.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn missing_required_visible_field_is_reported() {
        let c = catalog();
        let values = ValueMap::new(&c);
        let issues = validate(&c, &values, Tier::Napkin);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingRequiredValue);
        assert_eq!(issues[0].message, "Purchase Price is required");
        assert!(issues[0].blocks_save());
    }

    #[test]
    fn hidden_field_constraints_are_dormant() {
        let c = catalog();
        let values = ValueMap::new(&c);
        // vacancy is Mid-tier: at napkin its requiredness must not fire.
        let issues = validate(&c, &values, Tier::Napkin);
        assert!(issues.iter().all(|i| i.field != "vacancy"));
        let issues = validate(&c, &values, Tier::Mid);
        assert!(issues.iter().any(|i| i.field == "vacancy"));
    }

    #[test]
    fn out_of_range_is_soft() {
        let c = catalog();
        let mut values = ValueMap::new(&c);
        values.set(c.id_of("price").unwrap(), FieldValue::Currency(1.0));
        values.set(c.id_of("vacancy").unwrap(), FieldValue::Percentage(250.0));

        let issues = validate(&c, &values, Tier::Mid);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::OutOfRange);
        assert!(!issues[0].blocks_save());
    }

    #[test]
    fn type_mismatch_is_reported_and_blocks() {
        let c = catalog();
        let mut values = ValueMap::new(&c);
        values.set(c.id_of("price").unwrap(), FieldValue::Text("a lot".into()));

        let issues = validate(&c, &values, Tier::Napkin);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::TypeMismatch);
        assert!(issues[0].blocks_save());
    }

    #[test]
    fn validation_never_mutates_values() {
        let c = catalog();
        let mut values = ValueMap::new(&c);
        values.set(c.id_of("vacancy").unwrap(), FieldValue::Percentage(250.0));
        let before = values.clone();
        validate(&c, &values, Tier::Pro);
        assert_eq!(values, before);
    }
}
