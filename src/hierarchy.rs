//! Effective-active resolution for the category forest.
//!
//! A category is effectively active when its own flag is set and every
//! ancestor up the parent chain is effectively active. The parent links are
//! plain ids, so a snapshot may contain dangling references or cycles; both
//! resolve to "not active".

use std::collections::{HashMap, HashSet};

use crate::models::Category;

/// Resolver over one snapshot of the full category set.
///
/// The memo table lives only as long as the resolver, which is built per
/// request; reusing it after a category edit would serve stale answers.
pub struct CategoryHierarchy {
    effective: HashMap<i32, bool>,
}

impl CategoryHierarchy {
    pub fn new(categories: &[Category]) -> Self {
        let index: HashMap<i32, (bool, Option<i32>)> = categories
            .iter()
            .map(|c| (c.id, (c.is_active, c.parent_id)))
            .collect();

        let mut effective: HashMap<i32, bool> = HashMap::with_capacity(index.len());

        for &start in index.keys() {
            if effective.contains_key(&start) {
                continue;
            }

            // Iterative walk up the parent chain. Every node pushed onto the
            // path is itself active, so the chain's verdict applies to all of
            // them once the walk terminates.
            let mut path = Vec::new();
            let mut visited = HashSet::new();
            let mut current = start;
            let verdict = loop {
                if let Some(&known) = effective.get(&current) {
                    break known;
                }
                if !visited.insert(current) {
                    // parent chain loops back on itself
                    break false;
                }
                match index.get(&current) {
                    None => break false,
                    Some(&(false, _)) => {
                        path.push(current);
                        break false;
                    }
                    Some(&(true, None)) => {
                        path.push(current);
                        break true;
                    }
                    Some(&(true, Some(parent))) => {
                        path.push(current);
                        current = parent;
                    }
                }
            };

            for id in path {
                effective.insert(id, verdict);
            }
        }

        Self { effective }
    }

    /// Ids absent from the snapshot are reported as not active.
    pub fn is_effectively_active(&self, id: i32) -> bool {
        self.effective.get(&id).copied().unwrap_or(false)
    }

    /// All effectively active category ids, ascending.
    pub fn active_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .effective
            .iter()
            .filter(|(_, &active)| active)
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
