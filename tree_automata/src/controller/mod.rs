//! The controller: owns every node and drives each named system.
//!
//! ## Driving a system
//!
//! `process_input(system, input)`:
//! 1. Unknown system: error, nothing changes.
//! 2. First input for the system: the root becomes current and its
//!    `on_enter` fires, whether or not the input then matches anything.
//! 3. The current node evaluates the input.
//! 4. A match to a different node fires `on_exit` on the current node,
//!    swaps it, fires `on_enter` on the target and reports `true`.
//! 5. A match back to the current node fires nothing and reports `false`.
//! 6. No match reports `false`.

mod hierarchy;

pub use hierarchy::*;

use std::collections::BTreeMap;

use game_context::GameContext;
use tracing::{debug, warn};

use crate::automaton::{
    Action, IdGenerator, Input, Node, NodeBehavior, NodeCore, NodeId, PlainNode, TransitionRule,
};
use crate::error::ControllerError;

/// Settings for a controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// First id the controller hands out. Controllers with different seeds
    /// never share ids.
    pub id_seed: u64,

    /// Whether loading may fall back to a name-only search when a saved
    /// persistent id no longer resolves.
    pub name_fallback: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            id_seed: 1,
            name_fallback: true,
        }
    }
}

/// Owns all nodes and tracks one current node per system.
pub struct Controller {
    pub(crate) config: ControllerConfig,

    ids: IdGenerator,

    /// Slot `i` holds the node with the `i`-th issued id.
    pub(crate) arena: Vec<Node>,

    pub(crate) system_roots: BTreeMap<String, NodeId>,

    /// Created lazily on a system's first input.
    pub(crate) current_nodes: BTreeMap<String, NodeId>,

    pub(crate) changed: BTreeMap<String, bool>,

    pub(crate) context: GameContext,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Create a controller with default configuration and an empty context.
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            ids: IdGenerator::new(config.id_seed),
            config,
            arena: Vec::new(),
            system_roots: BTreeMap::new(),
            current_nodes: BTreeMap::new(),
            changed: BTreeMap::new(),
            context: GameContext::default(),
        }
    }

    /// Replace the shared context.
    pub fn with_context(mut self, context: GameContext) -> Self {
        self.context = context;
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.context
    }

    /// Create a node of any kind and insert it into the arena.
    pub fn create_node<B>(&mut self, name: impl Into<String>, behavior: B) -> NodeId
    where
        B: NodeBehavior,
    {
        let id = self.ids.next_id();
        let core = NodeCore::new(id, name);
        self.arena.push(Node::new(core, Box::new(behavior)));
        id
    }

    /// Create a node with no behavior beyond its rules.
    pub fn create_plain_node(&mut self, name: impl Into<String>) -> NodeId {
        self.create_node(name, PlainNode)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.ids.index_of(id).map(|index| &self.arena[index])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.ids.index_of(id).map(|index| &mut self.arena[index])
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Borrow a node's behavior as its concrete kind.
    pub fn behavior<T: NodeBehavior>(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(Node::behavior::<T>)
    }

    pub fn behavior_mut<T: NodeBehavior>(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).and_then(Node::behavior_mut::<T>)
    }

    /// First node in creation order with this name.
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.arena
            .iter()
            .find(|node| node.name() == name)
            .map(Node::id)
    }

    fn require_node(&self, id: NodeId) -> Result<usize, ControllerError> {
        self.ids
            .index_of(id)
            .ok_or(ControllerError::NodeNotFound(id))
    }

    /// Attach `child` below `parent` in the hierarchy.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), ControllerError> {
        let parent_index = self.require_node(parent)?;
        self.require_node(child)?;

        self.arena[parent_index].core_mut().add_child(child);
        self.assign_persistent_ids();
        Ok(())
    }

    /// Append a rule to `source`. Rules are evaluated in the order added.
    pub fn add_transition<G>(
        &mut self,
        source: NodeId,
        guard: G,
        target: NodeId,
        description: impl Into<String>,
    ) -> Result<(), ControllerError>
    where
        G: Fn(&Input, &GameContext) -> bool + 'static,
    {
        let source_index = self.require_node(source)?;
        self.require_node(target)?;

        self.arena[source_index]
            .core_mut()
            .add_rule(TransitionRule::new(guard, target, description));
        Ok(())
    }

    pub fn set_accepting(&mut self, id: NodeId, accepting: bool) -> Result<(), ControllerError> {
        let index = self.require_node(id)?;
        self.arena[index].core_mut().set_accepting(accepting);
        Ok(())
    }

    /// Register `root` as the root of `system`.
    ///
    /// Re-rooting a running system stops it; its next input enters the new root.
    pub fn set_system_root(
        &mut self,
        system: impl Into<String>,
        root: NodeId,
    ) -> Result<(), ControllerError> {
        self.require_node(root)?;
        let system = system.into();

        if let Some(previous) = self.system_roots.insert(system.clone(), root) {
            if previous != root && self.current_nodes.remove(&system).is_some() {
                debug!(system = %system, "system re-rooted; current node cleared");
                self.changed.remove(&system);
            }
        }

        self.assign_persistent_ids();
        Ok(())
    }

    pub fn system_root(&self, system: &str) -> Option<NodeId> {
        self.system_roots.get(system).copied()
    }

    /// Registered system names, in sorted order.
    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.system_roots.keys().map(String::as_str)
    }

    /// Current node of a system; `None` until the system's first input.
    pub fn current_node(&self, system: &str) -> Option<NodeId> {
        self.current_nodes.get(system).copied()
    }

    /// Whether the system's current node changed since the flag was last reset.
    pub fn has_node_changed(&self, system: &str) -> bool {
        self.changed.get(system).copied().unwrap_or(false)
    }

    pub fn reset_node_changed(&mut self, system: &str) {
        if let Some(flag) = self.changed.get_mut(system) {
            *flag = false;
        }
    }

    fn fire_enter(&mut self, id: NodeId) {
        if let Some(index) = self.ids.index_of(id) {
            self.arena[index].enter(&mut self.context);
        }
    }

    fn fire_exit(&mut self, id: NodeId) {
        if let Some(index) = self.ids.index_of(id) {
            self.arena[index].exit(&mut self.context);
        }
    }

    /// Feed an input to a system. Returns whether the current node changed.
    ///
    /// A rule that targets the current node matches but reports `false`
    /// and fires no hooks.
    pub fn process_input(&mut self, system: &str, input: &Input) -> Result<bool, ControllerError> {
        let Some(root) = self.system_root(system) else {
            warn!(system, "system not found");
            return Err(ControllerError::SystemNotFound(system.to_string()));
        };

        let current = match self.current_node(system) {
            Some(current) => current,
            None => {
                debug!(system, "starting system at its root");
                self.current_nodes.insert(system.to_string(), root);
                self.changed.insert(system.to_string(), true);
                self.fire_enter(root);
                root
            }
        };

        let index = self.require_node(current)?;
        let Some(next) = self.arena[index].evaluate_transition(input, &self.context) else {
            debug!(system, input = %input.input_type, "no rule matched");
            return Ok(false);
        };

        if next == current {
            debug!(system, node = %self.arena[index].name(), "rule targets current node");
            return Ok(false);
        }

        if self.ids.index_of(next).is_none() {
            warn!(system, target = %next, "rule targets a node outside this controller");
            return Ok(false);
        }

        self.fire_exit(current);
        self.current_nodes.insert(system.to_string(), next);
        self.changed.insert(system.to_string(), true);
        self.fire_enter(next);

        debug!(
            system,
            from = %self.arena[index].name(),
            to = %self.node(next).map(Node::name).unwrap_or_default(),
            "transitioned"
        );
        Ok(true)
    }

    /// Choices offered by a system's current node.
    ///
    /// Before a system's first input this lists the root's actions without
    /// entering the root.
    pub fn available_actions(&self, system: &str) -> Result<Vec<Action>, ControllerError> {
        let Some(root) = self.system_root(system) else {
            warn!(system, "system not found");
            return Err(ControllerError::SystemNotFound(system.to_string()));
        };

        let current = self.current_node(system).unwrap_or(root);
        let index = self.require_node(current)?;
        Ok(self.arena[index].available_actions(&self.context))
    }
}
