//! Node identity: process-local handles and structural persistent ids.

use serde::{Deserialize, Serialize};

/// Separator between node names in a persistent id.
pub const PATH_SEPARATOR: char = '/';

/// Handle to a node inside one controller's arena.
///
/// Only meaningful within the controller (and process run) that issued it.
/// Save data must never rely on it; use [`PersistentId`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues [`NodeId`]s for one controller.
///
/// Ids are `seed, seed + 1, ...` so two controllers with different seeds
/// never hand out the same id, and a test with a fixed seed always sees
/// the same ids.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: u64,
    issued: u64,
}

impl IdGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed, issued: 0 }
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.seed.wrapping_add(self.issued));
        self.issued += 1;
        id
    }

    /// Arena slot for an id issued by this generator, or `None` for a
    /// foreign or never-issued id.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let offset = id.0.wrapping_sub(self.seed);
        (offset < self.issued).then_some(offset as usize)
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}

/// Escapes separators in names so that a name containing one stays a
/// single path segment.
const ESCAPE: char = '\\';

fn push_escaped(path: &mut String, name: &str) {
    for c in name.chars() {
        if c == PATH_SEPARATOR || c == ESCAPE {
            path.push(ESCAPE);
        }
        path.push(c);
    }
}

/// A path of node names from a system root, e.g. `QuestSystem/MainQuest/FindSword`.
///
/// Derived purely from hierarchy position, so two runs that build the
/// same hierarchy produce the same ids regardless of allocation order.
/// A `/` or `\` inside a name is written with a leading `\`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersistentId(String);

impl PersistentId {
    /// Id of a system's root node.
    pub fn root(system: &str, root_name: &str) -> Self {
        let mut path = String::new();
        push_escaped(&mut path, system);
        path.push(PATH_SEPARATOR);
        push_escaped(&mut path, root_name);
        Self(path)
    }

    /// Id of a child of the node with this id.
    pub fn child(&self, name: &str) -> Self {
        let mut path = self.0.clone();
        path.push(PATH_SEPARATOR);
        push_escaped(&mut path, name);
        Self(path)
    }

    /// The unescaped names along the path, system first.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = vec![String::new()];
        let mut chars = self.0.chars();
        while let Some(c) = chars.next() {
            match c {
                ESCAPE => {
                    if let (Some(next), Some(last)) = (chars.next(), segments.last_mut()) {
                        last.push(next);
                    }
                }
                PATH_SEPARATOR => segments.push(String::new()),
                _ => {
                    if let Some(last) = segments.last_mut() {
                        last.push(c);
                    }
                }
            }
        }
        segments
    }

    /// The last name on the path.
    pub fn node_name(&self) -> String {
        self.segments().pop().unwrap_or_default()
    }

    /// The system name the path starts from.
    pub fn system(&self) -> String {
        self.segments().swap_remove(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PersistentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PersistentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PersistentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Both identities of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    pub id: NodeId,
    /// `None` until the node is attached below some system root.
    pub persistent_id: Option<PersistentId>,
}

impl NodeIdentity {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            persistent_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_generator() {
        let mut ids = IdGenerator::new(100);
        let first = ids.next_id();
        let second = ids.next_id();

        assert_eq!(first, NodeId(100));
        assert_eq!(second, NodeId(101));
        assert_eq!(ids.index_of(first), Some(0));
        assert_eq!(ids.index_of(second), Some(1));
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_foreign_ids_have_no_slot() {
        let mut ids = IdGenerator::new(100);
        ids.next_id();

        assert_eq!(ids.index_of(NodeId(99)), None);
        assert_eq!(ids.index_of(NodeId(101)), None);
        assert_eq!(ids.index_of(NodeId(0)), None);
    }

    #[test]
    fn test_generators_are_independent() {
        let mut a = IdGenerator::new(1);
        let mut b = IdGenerator::new(1);

        assert_eq!(a.next_id(), b.next_id());
        assert_eq!(a.next_id(), b.next_id());
    }

    #[test]
    fn test_persistent_id_paths() {
        let root = PersistentId::root("QuestSystem", "MainQuest");
        let child = root.child("FindSword");

        assert_eq!(root.as_str(), "QuestSystem/MainQuest");
        assert_eq!(child.as_str(), "QuestSystem/MainQuest/FindSword");
        assert_eq!(child.node_name(), "FindSword");
        assert_eq!(child.system(), "QuestSystem");
    }

    #[test]
    fn test_separator_in_name_is_escaped() {
        let slashed = PersistentId::root("World", "R").child("a/b");
        let nested = PersistentId::root("World", "R").child("a").child("b");

        assert_ne!(slashed, nested);
        assert_eq!(slashed.as_str(), "World/R/a\\/b");
        assert_eq!(slashed.node_name(), "a/b");
        assert_eq!(nested.node_name(), "b");
        assert_eq!(slashed.segments(), vec!["World", "R", "a/b"]);

        let backslash = PersistentId::root("World", "R").child("a\\");
        assert_eq!(backslash.node_name(), "a\\");
        assert_ne!(backslash.child("b"), PersistentId::root("World", "R").child("a/b"));
    }
}
