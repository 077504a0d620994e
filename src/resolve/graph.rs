//! Builtin Dependency Graph
//!
//! One [`DependencyGraph`] lives for exactly one resolution pass. Nodes are
//! stored in a [`SlotMap`] arena and memoized by name; edges are plain
//! [`NodeId`] keys in both directions, so the back-references used during
//! ordering never form ownership cycles.
//!
//! # Ordering
//!
//! [`DependencyGraph::into_ordered`] is a Kahn-style reduction over the
//! `depended_on_by` edges:
//!
//! 1. Seed the ready set with every node nothing depends on (the root).
//! 2. Pop a ready node, emit it, and delete its outgoing edges from the
//!    dependents list of each dependency.
//! 3. A dependency whose dependents list becomes empty is ready.
//!
//! Emission therefore runs dependents-first; reversing it yields
//! declaration order. Among simultaneously ready nodes the most recently
//! discovered is popped first, so after reversal independent builtins keep
//! their discovery order.
//!
//! Anything still holding dependents after the ready set drains sits on, or
//! behind, a cycle.

use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use super::scan::reserved_identifiers;
use crate::errors::{Result, ShaderSourceError};
use crate::registry::Registries;
use crate::text::strip_comments;

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug)]
struct DependencyNode {
    name: String,
    body: String,
    /// Position in discovery order, used as the ordering tie-break.
    discovered: usize,
    depends_on: SmallVec<[NodeId; 4]>,
    depended_on_by: SmallVec<[NodeId; 4]>,
    visited: bool,
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: SlotMap<NodeId, DependencyNode>,
    by_name: FxHashMap<String, NodeId>,
    discovery: Vec<NodeId>,
    unresolved: Vec<String>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `name`, creating it from `definition` on first sight.
    ///
    /// A fresh node's body is comment-stripped so references inside builtin
    /// documentation never become edges.
    pub fn get_or_insert(&mut self, name: &str, definition: &str) -> NodeId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }

        let id = self.nodes.insert(DependencyNode {
            name: name.to_string(),
            body: strip_comments(definition).into_owned(),
            discovered: self.discovery.len(),
            depends_on: SmallVec::new(),
            depended_on_by: SmallVec::new(),
            visited: false,
        });
        self.by_name.insert(name.to_string(), id);
        self.discovery.push(id);
        id
    }

    /// Discovers the transitive dependencies of `id` against `registries`.
    ///
    /// Each node is expanded at most once, which handles diamonds without
    /// duplicate edges and stops self references from recursing.
    pub fn expand(&mut self, id: NodeId, registries: &Registries) {
        let node = &mut self.nodes[id];
        if node.visited {
            return;
        }
        node.visited = true;

        let references: Vec<String> = reserved_identifiers(&node.body)
            .into_iter()
            .filter(|reference| *reference != node.name)
            .map(str::to_string)
            .collect();

        for reference in references {
            let Some(definition) = registries.definition(&reference) else {
                self.record_unresolved(reference);
                continue;
            };

            let dependency = self.get_or_insert(&reference, &definition);
            self.nodes[id].depends_on.push(dependency);
            self.nodes[dependency].depended_on_by.push(id);

            self.expand(dependency, registries);
        }
    }

    fn record_unresolved(&mut self, name: String) {
        if !self.unresolved.contains(&name) {
            self.unresolved.push(name);
        }
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn dependencies(&self, id: NodeId) -> Vec<&str> {
        self.nodes.get(id).map_or_else(Vec::new, |node| {
            node.depends_on
                .iter()
                .map(|&dep| self.nodes[dep].name.as_str())
                .collect()
        })
    }

    /// Reference names that exist in no registry, in first-occurrence order.
    #[must_use]
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Orders the graph so every dependency precedes its dependents.
    ///
    /// Consumes the graph. Returns the definition bodies in declaration order
    /// with `root` left out, plus the unresolved reference names.
    pub fn into_ordered(mut self, root: NodeId) -> Result<(Vec<String>, Vec<String>)> {
        let mut ready: BinaryHeap<usize> = self
            .discovery
            .iter()
            .filter(|&&id| self.nodes[id].depended_on_by.is_empty())
            .map(|&id| self.nodes[id].discovered)
            .collect();

        let mut emitted = Vec::with_capacity(self.nodes.len());
        while let Some(position) = ready.pop() {
            let id = self.discovery[position];
            emitted.push(id);

            let dependencies = std::mem::take(&mut self.nodes[id].depends_on);
            for dependency in dependencies {
                let dependents = &mut self.nodes[dependency].depended_on_by;
                if let Some(index) = dependents.iter().position(|&d| d == id) {
                    dependents.remove(index);
                }
                if dependents.is_empty() {
                    ready.push(self.nodes[dependency].discovered);
                }
            }
        }

        let cyclic: Vec<String> = self
            .discovery
            .iter()
            .filter(|&&id| !self.nodes[id].depended_on_by.is_empty())
            .map(|&id| self.nodes[id].name.clone())
            .collect();

        if !cyclic.is_empty() {
            log::error!(
                "A circular dependency was found in the following built-in functions/structs/constants: {}",
                cyclic.join(", ")
            );
            return Err(ShaderSourceError::CyclicDependency { names: cyclic });
        }

        let definitions = emitted
            .into_iter()
            .rev()
            .filter(|&id| id != root)
            .filter_map(|id| self.nodes.remove(id))
            .map(|node| node.body)
            .collect();

        Ok((definitions, self.unresolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_for(registries: &Registries, body: &str) -> (DependencyGraph, NodeId) {
        let mut graph = DependencyGraph::new();
        let root = graph.get_or_insert("main", body);
        graph.expand(root, registries);
        (graph, root)
    }

    #[test]
    fn test_memoized_by_name() {
        let mut graph = DependencyGraph::new();
        let a = graph.get_or_insert("czm_a", "float czm_a;");
        let again = graph.get_or_insert("czm_a", "ignored");

        assert_eq!(a, again);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_diamond_expanded_once() {
        let registries = Registries::new()
            .with_builtin("czm_a", "czm_c czm_a;")
            .with_builtin("czm_b", "czm_c czm_b;")
            .with_builtin("czm_c", "struct czm_c { float x; };");

        let (graph, root) = graph_for(&registries, "czm_a + czm_b");

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.dependencies(root), vec!["czm_a", "czm_b"]);

        let (definitions, unresolved) = graph.into_ordered(root).unwrap();
        assert_eq!(
            definitions,
            vec!["struct czm_c { float x; };", "czm_c czm_a;", "czm_c czm_b;"]
        );
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_independent_builtins_keep_discovery_order() {
        let registries = Registries::new()
            .with_builtin("czm_x", "float czm_x;")
            .with_builtin("czm_y", "float czm_y;")
            .with_builtin("czm_z", "float czm_z;");

        let (graph, root) = graph_for(&registries, "czm_y czm_z czm_x");
        let (definitions, _) = graph.into_ordered(root).unwrap();

        assert_eq!(definitions, vec!["float czm_y;", "float czm_z;", "float czm_x;"]);
    }

    #[test]
    fn test_self_reference_is_not_an_edge() {
        let registries =
            Registries::new().with_builtin("czm_rec", "float czm_rec(float x) { return czm_rec(x); }");

        let (graph, root) = graph_for(&registries, "czm_rec(1.0)");
        let (definitions, _) = graph.into_ordered(root).unwrap();

        assert_eq!(definitions.len(), 1);
    }

    #[test]
    fn test_cycle_reports_every_member() {
        let registries = Registries::new()
            .with_builtin("czm_a", "czm_b")
            .with_builtin("czm_b", "czm_a");

        let (graph, root) = graph_for(&registries, "czm_a");
        let err = graph.into_ordered(root).unwrap_err();

        match err {
            ShaderSourceError::CyclicDependency { names } => {
                assert_eq!(names, vec!["czm_a", "czm_b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unresolved_recorded_once() {
        let registries = Registries::new().with_builtin("czm_a", "czm_missing");

        let (graph, root) = graph_for(&registries, "czm_missing czm_a");
        assert_eq!(graph.unresolved(), ["czm_missing".to_string()]);

        let (definitions, unresolved) = graph.into_ordered(root).unwrap();
        assert_eq!(definitions, vec!["czm_missing"]);
        assert_eq!(unresolved, vec!["czm_missing"]);
    }

    #[test]
    fn test_commented_reference_ignored() {
        let registries = Registries::new()
            .with_builtin("czm_a", "/** uses czm_b */\nfloat czm_a;")
            .with_builtin("czm_b", "float czm_b;");

        let (graph, root) = graph_for(&registries, "czm_a");
        assert_eq!(graph.node_count(), 2);

        let (definitions, _) = graph.into_ordered(root).unwrap();
        assert_eq!(definitions, vec![" \nfloat czm_a;"]);
    }
}
