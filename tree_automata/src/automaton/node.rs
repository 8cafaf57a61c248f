//! Nodes: the unit of automaton state.
//!
//! A [`Node`] pairs the engine-owned [`NodeCore`] (identity, rules, children,
//! scalar state) with a boxed [`NodeBehavior`] that supplies the
//! kind-specific hooks. The controller only ever talks to the trait, so new
//! node kinds plug in without the engine knowing they exist.

use std::any::Any;

use game_context::GameContext;
use tracing::debug;

use super::identity::{NodeId, NodeIdentity, PersistentId};
use super::input::{Action, Input};
use super::value::StateData;

/// Predicate deciding whether a rule fires for an input.
pub type Guard = Box<dyn Fn(&Input, &GameContext) -> bool>;

/// A guarded edge to another node. Owned by its source node.
pub struct TransitionRule {
    guard: Guard,
    pub target: NodeId,
    pub description: String,
}

impl TransitionRule {
    pub fn new(
        guard: impl Fn(&Input, &GameContext) -> bool + 'static,
        target: NodeId,
        description: impl Into<String>,
    ) -> Self {
        Self {
            guard: Box::new(guard),
            target,
            description: description.into(),
        }
    }

    /// Run the guard.
    pub fn matches(&self, input: &Input, context: &GameContext) -> bool {
        (self.guard)(input, context)
    }
}

impl std::fmt::Debug for TransitionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRule")
            .field("target", &self.target)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// The part of a node the engine owns and understands.
#[derive(Debug)]
pub struct NodeCore {
    identity: NodeIdentity,
    name: String,
    /// Generic scalar state. Saved with the node when it is a system's current node.
    pub state_data: StateData,
    rules: Vec<TransitionRule>,
    /// Hierarchy links. Used for lookup and persistent ids, never for control flow.
    children: Vec<NodeId>,
    accepting: bool,
}

impl NodeCore {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            identity: NodeIdentity::new(id),
            name: name.into(),
            state_data: StateData::new(),
            rules: Vec::new(),
            children: Vec::new(),
            accepting: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.identity.id
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn persistent_id(&self) -> Option<&PersistentId> {
        self.identity.persistent_id.as_ref()
    }

    pub(crate) fn set_persistent_id(&mut self, persistent_id: Option<PersistentId>) {
        self.identity.persistent_id = persistent_id;
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this is a terminal/accepting state. Quest-like kinds read it
    /// in `on_exit` to decide between reward and failure.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    pub fn add_rule(&mut self, rule: TransitionRule) {
        self.rules.push(rule);
    }

    /// Attach a child. Duplicate links are ignored.
    pub fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Target of the first rule, in insertion order, whose guard matches.
    pub fn first_match(&self, input: &Input, context: &GameContext) -> Option<NodeId> {
        self.rules
            .iter()
            .find(|rule| rule.matches(input, context))
            .map(|rule| rule.target)
    }

    /// One action per rule, building [`Input::choice`] for the rule's index.
    pub fn rule_actions(&self) -> Vec<Action> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Action::new(
                    format!("transition_{index}"),
                    rule.description.clone(),
                    move || Input::choice(index),
                )
            })
            .collect()
    }
}

/// Upcast helper so behaviors can be downcast to their concrete kind.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Kind-specific hooks of a node.
///
/// Every method has a default giving plain-node semantics. Hooks are only
/// ever invoked by the controller, once per accepted transition.
/// Guards and `evaluate_transition` get a shared context and must not
/// change game state.
pub trait NodeBehavior: AsAny {
    /// Short name of the node kind, for logs and reports.
    fn kind(&self) -> &'static str {
        "node"
    }

    fn on_enter(&mut self, node: &mut NodeCore, context: &mut GameContext) {
        let _ = context;
        debug!(node = %node.name(), "entered node");
    }

    fn on_exit(&mut self, node: &mut NodeCore, context: &mut GameContext) {
        let _ = context;
        debug!(node = %node.name(), "exited node");
    }

    /// Pick the next node for an input. `None` means no transition.
    fn evaluate_transition(
        &self,
        node: &NodeCore,
        input: &Input,
        context: &GameContext,
    ) -> Option<NodeId> {
        node.first_match(input, context)
    }

    /// Choices offered to the player from this node.
    ///
    /// Overrides that add actions must make sure some rule (or their own
    /// `evaluate_transition`) recognizes the built input; otherwise the
    /// action silently does nothing.
    fn available_actions(&self, node: &NodeCore, context: &GameContext) -> Vec<Action> {
        let _ = context;
        node.rule_actions()
    }
}

/// A node with no behavior beyond its rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainNode;

impl NodeBehavior for PlainNode {}

/// A node as stored in the controller's arena.
pub struct Node {
    core: NodeCore,
    behavior: Box<dyn NodeBehavior>,
}

impl Node {
    pub fn new(core: NodeCore, behavior: Box<dyn NodeBehavior>) -> Self {
        Self { core, behavior }
    }

    pub fn core(&self) -> &NodeCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    pub fn id(&self) -> NodeId {
        self.core.id()
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn kind(&self) -> &'static str {
        self.behavior.kind()
    }

    /// Borrow the behavior as its concrete kind.
    pub fn behavior<T: NodeBehavior>(&self) -> Option<&T> {
        (*self.behavior).as_any().downcast_ref::<T>()
    }

    pub fn behavior_mut<T: NodeBehavior>(&mut self) -> Option<&mut T> {
        (*self.behavior).as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn enter(&mut self, context: &mut GameContext) {
        self.behavior.on_enter(&mut self.core, context);
    }

    pub(crate) fn exit(&mut self, context: &mut GameContext) {
        self.behavior.on_exit(&mut self.core, context);
    }

    pub fn evaluate_transition(&self, input: &Input, context: &GameContext) -> Option<NodeId> {
        self.behavior.evaluate_transition(&self.core, input, context)
    }

    pub fn available_actions(&self, context: &GameContext) -> Vec<Action> {
        self.behavior.available_actions(&self.core, context)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("core", &self.core)
            .finish()
    }
}
