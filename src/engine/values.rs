//! Dense per-basket value storage.
//!
//! The working map is indexed by [`FieldId`]; string keys appear only in
//! the snapshot form exchanged with the persistence collaborator. Absent
//! fields stay absent in the snapshot ("not yet computable" is a real
//! state, distinct from any stored value).

use std::collections::BTreeMap;

use crate::catalog::{BasketConfig, FieldId, FieldValue};

/// The key -> value form a basket round-trips through persistence.
/// Ordered so serialized output is stable across runs.
pub type Snapshot = BTreeMap<String, FieldValue>;

/// Current values of one basket instance for one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    slots: Vec<Option<FieldValue>>,
}

impl ValueMap {
    pub fn new(catalog: &BasketConfig) -> Self {
        Self {
            slots: vec![None; catalog.len()],
        }
    }

    /// Builds a working map from a stored snapshot. Keys the catalogue no
    /// longer knows are skipped with a log line rather than failing the
    /// load; schema drift must not brick an existing project.
    pub fn from_snapshot(catalog: &BasketConfig, snapshot: &Snapshot) -> Self {
        let mut map = Self::new(catalog);
        for (key, value) in snapshot {
            match catalog.id_of(key) {
                Ok(id) => map.set(id, value.clone()),
                Err(_) => {
                    tracing::warn!(basket = catalog.basket_id(), %key, "dropping unknown stored field");
                }
            }
        }
        map
    }

    /// Renders back to the snapshot form, omitting absent fields.
    pub fn to_snapshot(&self, catalog: &BasketConfig) -> Snapshot {
        let mut out = Snapshot::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(v) = slot {
                out.insert(catalog.field(FieldId::new(i)).key.to_string(), v.clone());
            }
        }
        out
    }

    #[inline(always)]
    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.slots[id.index()].as_ref()
    }

    #[inline(always)]
    pub fn set(&mut self, id: FieldId, value: FieldValue) {
        self.slots[id.index()] = Some(value);
    }

    pub fn clear(&mut self, id: FieldId) {
        self.slots[id.index()] = None;
    }

    pub fn is_absent(&self, id: FieldId) -> bool {
        self.slots[id.index()].is_none()
    }
}
