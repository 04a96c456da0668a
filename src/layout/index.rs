//! Identifier index over the nodes of a model tree
//!
//! The tree is walked depth-first in pre-order, children in their given order.
//! Every node that carries an id is recorded; elements of other kinds are not
//! recorded but their descendants are still visited. When two nodes share an
//! id, the one visited later wins.
//!
//! The index stores the position of each node as a path of child indices
//! rather than a reference, so the same index can hand out `&SNode` or
//! `&mut SNode` for the tree it was built from. It is only meaningful as long
//! as that tree's structure is unchanged.

use std::collections::HashMap;

use crate::model::{ModelElement, SModelElement, SNode};

/// Position of an element as child indices from the root (empty = the root)
pub type NodePath = Vec<usize>;

/// Mapping from node id to the node's position in the tree
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    paths: HashMap<String, NodePath>,
}

impl NodeIndex {
    /// Index every identified node reachable from `root`, including `root` itself
    pub fn build<E: ModelElement + ?Sized>(root: &E) -> Self {
        let mut paths = HashMap::new();
        let visited = walk_nodes(root, |path, id, _| {
            paths.insert(id.to_string(), path.to_vec());
        });
        tracing::debug!(elements = visited, nodes = paths.len(), "built node index");
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains_key(id)
    }

    /// Indexed ids, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// Tree position of the node with this id
    pub fn path(&self, id: &str) -> Option<&[usize]> {
        self.paths.get(id).map(Vec::as_slice)
    }

    /// Look up a node in the tree this index was built from
    pub fn resolve<'a, E: ModelElement + ?Sized>(&self, root: &'a E, id: &str) -> Option<&'a SNode> {
        let path = self.path(id)?;
        let Some((first, rest)) = path.split_first() else {
            return root.as_node();
        };
        let mut current: &SModelElement = root.children().get(*first)?;
        for &position in rest {
            current = current.children().get(position)?;
        }
        current.as_node()
    }

    /// Look up a node for mutation in the tree this index was built from
    pub fn resolve_mut<'a, E: ModelElement + ?Sized>(
        &self,
        root: &'a mut E,
        id: &str,
    ) -> Option<&'a mut SNode> {
        let path = self.path(id)?;
        let Some((first, rest)) = path.split_first() else {
            return root.as_node_mut();
        };
        let mut current: &mut SModelElement = root.children_mut().get_mut(*first)?;
        for &position in rest {
            current = current.children_mut().get_mut(position)?;
        }
        current.as_node_mut()
    }

    /// Indexed ids close to `target`, nearest first (at most three)
    pub fn similar_ids(&self, target: &str, max_distance: usize) -> Vec<String> {
        let mut candidates: Vec<(&str, usize)> = self
            .ids()
            .filter_map(|id| {
                let dist = levenshtein_distance(id, target);
                (dist <= max_distance && dist > 0).then_some((id, dist))
            })
            .collect();

        candidates.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));
        candidates
            .into_iter()
            .map(|(id, _)| id.to_string())
            .take(3)
            .collect()
    }
}

/// Map every identified node reachable from `root` to a reference to it
pub fn create_id_to_node_map<E: ModelElement + ?Sized>(root: &E) -> HashMap<&str, &SNode> {
    let mut map = HashMap::new();
    walk_nodes(root, |_, id, node| {
        map.insert(id, node);
    });
    map
}

/// Pre-order walk calling `visit` for every node that has an id.
///
/// Uses an explicit stack, so tree depth is bounded by memory rather than by
/// the call stack. Returns the number of elements visited.
fn walk_nodes<'a, E, F>(root: &'a E, mut visit: F) -> usize
where
    E: ModelElement + ?Sized,
    F: FnMut(&[usize], &'a str, &'a SNode),
{
    if let Some(node) = root.as_node() {
        if let Some(id) = node.id.as_deref() {
            visit(&[], id, node);
        }
    }

    let mut visited = 1;
    let mut path: NodePath = Vec::new();
    // (depth, position among siblings, element)
    let mut stack: Vec<(usize, usize, &'a SModelElement)> = Vec::new();
    push_children(&mut stack, root.children(), 1);

    while let Some((depth, position, element)) = stack.pop() {
        visited += 1;
        path.truncate(depth - 1);
        path.push(position);

        if let Some(node) = element.as_node() {
            if let Some(id) = node.id.as_deref() {
                tracing::trace!(id, ?path, "indexed node");
                visit(&path, id, node);
            }
        }

        push_children(&mut stack, element.children(), depth + 1);
    }

    visited
}

fn push_children<'a>(
    stack: &mut Vec<(usize, usize, &'a SModelElement)>,
    children: &'a [SModelElement],
    depth: usize,
) {
    // Reversed so the first child is popped first
    stack.extend(
        children
            .iter()
            .enumerate()
            .rev()
            .map(|(position, child)| (depth, position, child)),
    );
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    if a_chars.is_empty() {
        return n;
    }
    if n == 0 {
        return a_chars.len();
    }

    // Single-row dynamic programming
    let mut row: Vec<usize> = (0..=n).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[n]
}
