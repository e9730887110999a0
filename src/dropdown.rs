//! Category dropdown tree construction.
//!
//! Input is a flat, already-filtered category list. A category attaches
//! under its parent only when the parent survived the same filter;
//! otherwise it is promoted to a root. Cyclic or self-referential parent
//! chains never reach a root, so their members simply drop out of the
//! forest; the visited set makes that explicit and bounds the recursion.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::Category;

#[derive(Debug, Clone, Serialize)]
pub struct DropdownNode {
    pub id: i32,
    pub name: String,
    pub children: Vec<DropdownNode>,
}

/// Builds the forest. Roots and every children list are sorted by name
/// (byte-wise, case-sensitive) for deterministic output.
pub fn build_tree(categories: &[Category]) -> Vec<DropdownNode> {
    let present: HashSet<i32> = categories.iter().map(|c| c.id).collect();

    let mut children_of: HashMap<i32, Vec<&Category>> = HashMap::new();
    let mut roots: Vec<&Category> = Vec::new();
    for category in categories {
        match category.parent_id {
            Some(parent) if present.contains(&parent) => {
                children_of.entry(parent).or_default().push(category);
            }
            _ => roots.push(category),
        }
    }

    roots.sort_by(|a, b| a.name.cmp(&b.name));

    let mut visited = HashSet::new();
    roots
        .into_iter()
        .filter_map(|root| build_node(root, &children_of, &mut visited))
        .collect()
}

fn build_node(
    category: &Category,
    children_of: &HashMap<i32, Vec<&Category>>,
    visited: &mut HashSet<i32>,
) -> Option<DropdownNode> {
    if !visited.insert(category.id) {
        return None;
    }

    let mut children: Vec<&Category> = children_of
        .get(&category.id)
        .map(|v| v.to_vec())
        .unwrap_or_default();
    children.sort_by(|a, b| a.name.cmp(&b.name));

    Some(DropdownNode {
        id: category.id,
        name: category.name.clone(),
        children: children
            .into_iter()
            .filter_map(|child| build_node(child, children_of, visited))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::category;

    fn names(nodes: &[DropdownNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn children_attach_under_present_parents() {
        let cats = vec![
            category(1, "World", None, true),
            category(2, "Asia", Some(1), true),
            category(3, "Europe", Some(1), true),
        ];
        let tree = build_tree(&cats);
        assert_eq!(names(&tree), ["World"]);
        assert_eq!(names(&tree[0].children), ["Asia", "Europe"]);
    }

    #[test]
    fn excluded_parent_promotes_child_to_root() {
        // parent id 9 was filtered out of the input set
        let cats = vec![
            category(2, "Local", Some(9), true),
            category(1, "World", None, true),
        ];
        let tree = build_tree(&cats);
        assert_eq!(names(&tree), ["Local", "World"]);
    }

    #[test]
    fn roots_and_children_sorted_by_name() {
        let cats = vec![
            category(1, "b", None, true),
            category(2, "a", None, true),
            category(3, "z", Some(1), true),
            category(4, "c", Some(1), true),
        ];
        let tree = build_tree(&cats);
        assert_eq!(names(&tree), ["a", "b"]);
        assert_eq!(names(&tree[1].children), ["c", "z"]);

        for window in tree.windows(2) {
            assert!(window[0].name <= window[1].name);
        }
    }

    #[test]
    fn self_parented_category_drops_out() {
        let cats = vec![
            category(1, "ok", None, true),
            category(2, "loop", Some(2), true),
        ];
        let tree = build_tree(&cats);
        assert_eq!(names(&tree), ["ok"]);
    }

    #[test]
    fn cyclic_chain_drops_out_without_looping() {
        let cats = vec![
            category(1, "a", Some(2), true),
            category(2, "b", Some(1), true),
            category(3, "root", None, true),
        ];
        let tree = build_tree(&cats);
        assert_eq!(names(&tree), ["root"]);
    }

    #[test]
    fn no_node_appears_twice() {
        let cats = vec![
            category(1, "r", None, true),
            category(2, "x", Some(1), true),
            category(3, "y", Some(2), true),
        ];
        let tree = build_tree(&cats);
        let mut seen = HashSet::new();
        let mut stack: Vec<&DropdownNode> = tree.iter().collect();
        while let Some(node) = stack.pop() {
            assert!(seen.insert(node.id));
            stack.extend(node.children.iter());
        }
        assert_eq!(seen.len(), 3);
    }
}
