//! Walks over the child hierarchy below each system root.
//!
//! All walks are depth-first, pre-order, children in insertion order, and
//! keep a visited set so a cyclic or shared child link is followed once.
//! The first path a walk finds to a node is that node's path.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::automaton::{NodeId, PersistentId};

use super::Controller;

/// One node met while walking a system's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyEntry {
    pub node: NodeId,
    /// 0 for the root.
    pub depth: usize,
    pub path: PersistentId,
}

impl Controller {
    /// Walk `system`'s hierarchy until `stop` returns true; returns the
    /// entry it stopped at.
    pub(crate) fn walk_system<F>(&self, system: &str, mut stop: F) -> Option<HierarchyEntry>
    where
        F: FnMut(&HierarchyEntry) -> bool,
    {
        let root = self.system_root(system)?;
        let root_name = self.node(root)?.name();

        let mut visited = HashSet::new();
        let mut stack = vec![HierarchyEntry {
            node: root,
            depth: 0,
            path: PersistentId::root(system, root_name),
        }];

        while let Some(entry) = stack.pop() {
            if !visited.insert(entry.node) {
                continue;
            }
            let Some(node) = self.node(entry.node) else {
                continue;
            };

            if stop(&entry) {
                return Some(entry);
            }

            for &child in node.core().children().iter().rev() {
                if visited.contains(&child) {
                    continue;
                }
                if let Some(child_node) = self.node(child) {
                    stack.push(HierarchyEntry {
                        node: child,
                        depth: entry.depth + 1,
                        path: entry.path.child(child_node.name()),
                    });
                }
            }
        }

        None
    }

    /// Every node below `system`'s root in walk order, root first.
    pub fn hierarchy(&self, system: &str) -> Vec<HierarchyEntry> {
        let mut entries = Vec::new();
        self.walk_system(system, |entry| {
            entries.push(entry.clone());
            false
        });
        entries
    }

    /// Re-derive every node's persistent id from the current hierarchy.
    ///
    /// Systems are visited in name order; a node reachable from several
    /// roots keeps the first path found. Nodes outside every hierarchy
    /// have no persistent id.
    pub(crate) fn assign_persistent_ids(&mut self) {
        let mut assigned: Vec<(NodeId, PersistentId)> = Vec::new();
        let mut seen = HashSet::new();

        for system in self.system_roots.keys() {
            for entry in self.hierarchy(system) {
                if seen.insert(entry.node) {
                    assigned.push((entry.node, entry.path));
                }
            }
        }

        for node in &mut self.arena {
            node.core_mut().set_persistent_id(None);
        }
        for (id, path) in assigned {
            if let Some(node) = self.node_mut(id) {
                node.core_mut().set_persistent_id(Some(path));
            }
        }
    }

    /// The node's persistent id, if it sits below any system root.
    pub fn persistent_id(&self, id: NodeId) -> Option<&PersistentId> {
        self.node(id).and_then(|node| node.core().persistent_id())
    }

    /// Path from `system`'s root to `target`, if `target` is in that hierarchy.
    pub fn path_to(&self, system: &str, target: NodeId) -> Option<PersistentId> {
        self.walk_system(system, |entry| entry.node == target)
            .map(|entry| entry.path)
    }

    /// Resolve a persistent id within one system's hierarchy.
    pub fn find_by_persistent_id(
        &self,
        system: &str,
        persistent_id: &PersistentId,
    ) -> Option<NodeId> {
        self.walk_system(system, |entry| entry.path == *persistent_id)
            .map(|entry| entry.node)
    }

    /// First node named `name` within one system's hierarchy.
    pub fn find_in_hierarchy_by_name(&self, system: &str, name: &str) -> Option<NodeId> {
        self.walk_system(system, |entry| {
            self.node(entry.node).is_some_and(|node| node.name() == name)
        })
        .map(|entry| entry.node)
    }

    /// Whether `target` is in the child hierarchy of any system.
    ///
    /// Follows `children`, not rules: this answers hierarchy membership,
    /// not whether play can get there.
    pub fn is_reachable(&self, target: NodeId) -> bool {
        if self.node(target).is_none() {
            return false;
        }

        self.system_roots
            .keys()
            .any(|system| self.walk_system(system, |entry| entry.node == target).is_some())
    }

    /// Indented `name: 'persistent id'` listing of a system's hierarchy.
    pub fn hierarchy_report(&self, system: &str) -> Option<String> {
        self.system_root(system)?;

        let mut report = String::new();
        for entry in self.hierarchy(system) {
            let name = self.node(entry.node).map(|node| node.name()).unwrap_or("?");
            let _ = writeln!(
                report,
                "{}- {}: '{}'",
                "  ".repeat(entry.depth),
                name,
                entry.path
            );
        }
        Some(report)
    }
}
