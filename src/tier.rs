//! Tier projection: which fields and groups a given disclosure level shows.
//!
//! Pure functions over the catalogue; visibility never influences
//! computation (hidden fields still recompute), only validation and the UI.

use crate::catalog::{BasketConfig, FieldDefinition, FieldGroup, FieldId, Tier};

/// All fields visible at `tier`, in declaration order.
pub fn visible_fields(catalog: &BasketConfig, tier: Tier) -> Vec<&FieldDefinition> {
    catalog.fields_for_tier(tier).collect()
}

/// A group together with its members that survive the tier filter.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleGroup<'a> {
    pub group: &'a FieldGroup,
    pub members: Vec<FieldId>,
}

/// All groups visible at `tier`, each restricted to its visible members.
/// A group whose member set filters down to nothing is omitted.
pub fn visible_groups(catalog: &BasketConfig, tier: Tier) -> Vec<VisibleGroup<'_>> {
    catalog
        .groups()
        .iter()
        .filter(|g| g.tier <= tier)
        .filter_map(|group| {
            let members: Vec<FieldId> = catalog
                .group_members(group)
                .into_iter()
                .filter(|&id| catalog.field(id).tier <= tier)
                .collect();
            if members.is_empty() {
                None
            } else {
                Some(VisibleGroup { group, members })
            }
        })
        .collect()
}
