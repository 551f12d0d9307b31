//! Builds the field dependency graph for one basket and derives a
//! deterministic topological evaluation order from it.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};

use crate::catalog::{BasketConfig, FieldId};
use crate::error::CatalogError;

/// The directed graph of "field X's formula reads field Y" relationships.
/// Derived once per catalogue at load time; never persisted.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    children: Vec<Vec<FieldId>>,
    order: Vec<FieldId>,
}

impl DependencyGraph {
    /// Builds the graph and its evaluation order, or reports a cycle with
    /// the full offending path.
    pub fn build(catalog: &BasketConfig) -> Result<Self, CatalogError> {
        let count = catalog.len();
        let mut children: Vec<Vec<FieldId>> = vec![Vec::new(); count];
        let mut in_degree = vec![0usize; count];

        for i in 0..count {
            let id = FieldId::new(i);
            let parents = catalog.parents(id);
            in_degree[i] = parents.len();
            for &p in parents {
                children[p.index()].push(id);
            }
        }

        // Kahn's algorithm. The ready queue is a min-heap on the field index,
        // so ties between independent fields break by declaration order and
        // the resulting order is reproducible.
        let mut ready: BinaryHeap<Reverse<u32>> = (0..count as u32)
            .filter(|&i| in_degree[i as usize] == 0)
            .map(Reverse)
            .collect();
        let mut order = Vec::with_capacity(count);

        while let Some(Reverse(i)) = ready.pop() {
            let id = FieldId(i);
            order.push(id);
            for &child in &children[id.index()] {
                in_degree[child.index()] -= 1;
                if in_degree[child.index()] == 0 {
                    ready.push(Reverse(child.0));
                }
            }
        }

        if order.len() != count {
            return Err(CatalogError::Cycle {
                basket: catalog.basket_id().to_string(),
                path: find_cycle(catalog),
            });
        }

        Ok(Self { children, order })
    }

    /// Field ids such that every field appears after all of its inputs.
    pub fn evaluation_order(&self) -> &[FieldId] {
        &self.order
    }

    /// The edited field plus everything transitively derived from it.
    /// Drives incremental recompute.
    pub fn downstream_of(&self, start: FieldId) -> HashSet<FieldId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(id) = queue.pop_front() {
            if visited.insert(id) {
                queue.extend(&self.children[id.index()]);
            }
        }
        visited
    }
}

/// Locates one cycle by DFS along parent edges and returns its keys in
/// dependency order. Only called once a cycle is known to exist.
fn find_cycle(catalog: &BasketConfig) -> Vec<String> {
    #[derive(Clone, Copy, PartialEq)]
    enum Visit {
        None,
        Visiting,
        Done,
    }

    fn visit(
        id: FieldId,
        catalog: &BasketConfig,
        state: &mut [Visit],
        stack: &mut Vec<FieldId>,
    ) -> Option<Vec<FieldId>> {
        match state[id.index()] {
            Visit::Done => return None,
            Visit::Visiting => {
                let entry = stack.iter().position(|&s| s == id).unwrap_or(0);
                return Some(stack[entry..].to_vec());
            }
            Visit::None => {}
        }

        state[id.index()] = Visit::Visiting;
        stack.push(id);
        for &parent in catalog.parents(id) {
            if let Some(cycle) = visit(parent, catalog, state, stack) {
                return Some(cycle);
            }
        }
        stack.pop();
        state[id.index()] = Visit::Done;
        None
    }

    let mut state = vec![Visit::None; catalog.len()];
    let mut stack = Vec::new();
    for i in 0..catalog.len() {
        if let Some(cycle) = visit(FieldId::new(i), catalog, &mut state, &mut stack) {
            return cycle
                .into_iter()
                .map(|id| catalog.field(id).key.to_string())
                .collect();
        }
    }
    Vec::new()
}
