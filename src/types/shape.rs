//! Nested presentation shape of a schema

use std::collections::BTreeMap;

/// A node of the shape tree: a leaf placeholder or a nested structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeNode {
    /// Filled with the decoded value of the field sharing this key
    Leaf,
    /// A nested struct
    Struct(ShapeTree),
}

/// Mapping from identifiers to leaves and nested structures.
///
/// Array fields appear once, under their bare identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeTree {
    children: BTreeMap<String, ShapeNode>,
}

impl ShapeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a leaf placeholder. A later declaration with the same key replaces the earlier one.
    pub fn insert_leaf(&mut self, id: impl Into<String>) {
        self.children.insert(id.into(), ShapeNode::Leaf);
    }

    /// Insert a nested structure, replacing any earlier node under the same key.
    pub fn insert_struct(&mut self, id: impl Into<String>, tree: ShapeTree) {
        self.children.insert(id.into(), ShapeNode::Struct(tree));
    }

    /// Node directly under `id`.
    pub fn get(&self, id: &str) -> Option<&ShapeNode> {
        self.children.get(id)
    }

    /// Direct children in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShapeNode)> {
        self.children.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves at any depth.
    pub fn leaf_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                ShapeNode::Leaf => 1,
                ShapeNode::Struct(tree) => tree.leaf_count(),
            })
            .sum()
    }

    /// Key path of every leaf, depth-first in key order.
    pub fn leaf_paths(&self) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        self.collect_paths(&mut Vec::new(), &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
        for (key, node) in &self.children {
            prefix.push(key.clone());
            match node {
                ShapeNode::Leaf => out.push(prefix.clone()),
                ShapeNode::Struct(tree) => tree.collect_paths(prefix, out),
            }
            prefix.pop();
        }
    }
}
