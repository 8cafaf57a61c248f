//! Dialogue nodes: a line of text and the player's possible responses.

use std::cell::Cell;

use game_context::GameContext;
use tracing::{debug, info};

use crate::automaton::{Action, Input, NodeBehavior, NodeCore, NodeId, INDEX_PARAM};

/// Input type built by response actions.
pub const DIALOGUE_RESPONSE_INPUT: &str = "dialogue_response";

/// Predicate deciding whether a response is offered.
pub type ResponseRequirement = Box<dyn Fn(&GameContext) -> bool>;

/// Runs when the dialogue is shown, or when it is left through a response.
pub type ContextHook = Box<dyn Fn(&mut GameContext)>;

pub struct DialogueResponse {
    pub text: String,
    pub target: NodeId,
    requirement: Option<ResponseRequirement>,
    effect: Option<ContextHook>,
}

impl DialogueResponse {
    pub fn new(text: impl Into<String>, target: NodeId) -> Self {
        Self {
            text: text.into(),
            target,
            requirement: None,
            effect: None,
        }
    }

    pub fn with_requirement<F>(mut self, requirement: F) -> Self
    where
        F: Fn(&GameContext) -> bool + 'static,
    {
        self.requirement = Some(Box::new(requirement));
        self
    }

    /// Change the context when the dialogue is left through this response.
    pub fn with_effect<F>(mut self, effect: F) -> Self
    where
        F: Fn(&mut GameContext) + 'static,
    {
        self.effect = Some(Box::new(effect));
        self
    }

    /// Whether the response is currently offered.
    pub fn is_available(&self, context: &GameContext) -> bool {
        self.requirement.as_ref().map_or(true, |req| req(context))
    }
}

impl std::fmt::Debug for DialogueResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueResponse")
            .field("text", &self.text)
            .field("target", &self.target)
            .field("conditional", &self.requirement.is_some())
            .field("has_effect", &self.effect.is_some())
            .finish()
    }
}

/// A node where a speaker says something and the player answers.
///
/// Responses are numbered in insertion order; hidden responses keep their
/// index so `dialogue_response{index}` inputs stay stable.
pub struct DialogueNode {
    pub speaker: String,
    pub text: String,
    pub responses: Vec<DialogueResponse>,
    on_show: Option<ContextHook>,
    /// Response picked by the last evaluation; its effect runs on exit.
    chosen: Cell<Option<usize>>,
}

impl DialogueNode {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            responses: Vec::new(),
            on_show: None,
            chosen: Cell::new(None),
        }
    }

    pub fn with_response(mut self, text: impl Into<String>, target: NodeId) -> Self {
        self.responses.push(DialogueResponse::new(text, target));
        self
    }

    pub fn with_conditional_response<F>(
        mut self,
        text: impl Into<String>,
        target: NodeId,
        requirement: F,
    ) -> Self
    where
        F: Fn(&GameContext) -> bool + 'static,
    {
        self.responses
            .push(DialogueResponse::new(text, target).with_requirement(requirement));
        self
    }

    /// Add a fully built response, e.g. one with an effect.
    pub fn with_dialogue_response(mut self, response: DialogueResponse) -> Self {
        self.responses.push(response);
        self
    }

    pub fn with_on_show<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut GameContext) + 'static,
    {
        self.on_show = Some(Box::new(hook));
        self
    }

    /// The input the action for response `index` builds.
    pub fn response_input(index: usize) -> Input {
        Input::new(DIALOGUE_RESPONSE_INPUT).with_param(INDEX_PARAM, index)
    }
}

impl std::fmt::Debug for DialogueNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueNode")
            .field("speaker", &self.speaker)
            .field("text", &self.text)
            .field("responses", &self.responses)
            .finish_non_exhaustive()
    }
}

impl NodeBehavior for DialogueNode {
    fn kind(&self) -> &'static str {
        "dialogue"
    }

    fn on_enter(&mut self, node: &mut NodeCore, context: &mut GameContext) {
        info!(speaker = %self.speaker, node = %node.name(), "dialogue shown");
        self.chosen.set(None);
        if let Some(hook) = &self.on_show {
            hook(context);
        }
        context.journal.record_dialogue(node.name(), self.text.clone());
    }

    fn on_exit(&mut self, node: &mut NodeCore, context: &mut GameContext) {
        let Some(index) = self.chosen.take() else {
            return;
        };
        if let Some(effect) = self.responses.get(index).and_then(|r| r.effect.as_ref()) {
            debug!(node = %node.name(), response = index, "applying response effect");
            effect(context);
        }
    }

    fn evaluate_transition(
        &self,
        node: &NodeCore,
        input: &Input,
        context: &GameContext,
    ) -> Option<NodeId> {
        self.chosen.set(None);
        if input.is(DIALOGUE_RESPONSE_INPUT) {
            let response = input.index().and_then(|index| {
                self.responses
                    .get(index)
                    .filter(|response| response.is_available(context))
                    .map(|response| (index, response.target))
            });
            if let Some((index, target)) = response {
                self.chosen.set(Some(index));
                return Some(target);
            }
            debug!(node = %node.name(), "response unavailable; trying rules");
        }
        node.first_match(input, context)
    }

    fn available_actions(&self, node: &NodeCore, context: &GameContext) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .responses
            .iter()
            .enumerate()
            .filter(|(_, response)| response.is_available(context))
            .map(|(index, response)| {
                Action::new(format!("response_{index}"), response.text.clone(), move || {
                    DialogueNode::response_input(index)
                })
            })
            .collect();
        actions.extend(node.rule_actions());
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::guards;
    use crate::controller::Controller;
    use pretty_assertions::assert_eq;

    /// Elder greeting with a plain reply, a reply gated on a fact, and a
    /// "leave" rule.
    fn elder(controller: &mut Controller) -> (NodeId, NodeId, NodeId, NodeId) {
        let farewell = controller.create_plain_node("farewell");
        let secret = controller.create_plain_node("secret");
        let gone = controller.create_plain_node("gone");
        let greeting = controller.create_node(
            "elder_greeting",
            DialogueNode::new("Elder", "Welcome, traveler.")
                .with_response("Goodbye.", farewell)
                .with_conditional_response("I know about the ruins.", secret, |ctx: &GameContext| {
                    ctx.player.knows("ruins")
                })
                .with_on_show(|ctx: &mut GameContext| {
                    ctx.player.learn_fact("met_elder");
                }),
        );
        controller
            .add_transition(greeting, guards::input_type("leave"), gone, "Walk away")
            .unwrap();
        controller.set_system_root("DialogueSystem", greeting).unwrap();
        (greeting, farewell, secret, gone)
    }

    fn action_names(controller: &Controller) -> Vec<String> {
        controller
            .available_actions("DialogueSystem")
            .unwrap()
            .into_iter()
            .map(|action| action.name)
            .collect()
    }

    #[test]
    fn test_enter_records_dialogue_and_runs_hook() {
        let mut controller = Controller::new();
        elder(&mut controller);

        controller.process_input("DialogueSystem", &Input::new("look")).unwrap();

        let context = controller.context();
        assert_eq!(
            context.journal.dialogue.get("elder_greeting").map(String::as_str),
            Some("Welcome, traveler.")
        );
        assert!(context.player.knows("met_elder"));
    }

    #[test]
    fn test_conditional_responses_hidden() {
        let mut controller = Controller::new();
        elder(&mut controller);

        assert_eq!(action_names(&controller), vec!["response_0", "transition_0"]);

        controller.context_mut().player.learn_fact("ruins");
        assert_eq!(
            action_names(&controller),
            vec!["response_0", "response_1", "transition_0"]
        );
    }

    #[test]
    fn test_response_action_transitions() {
        let mut controller = Controller::new();
        let (_, farewell, _, _) = elder(&mut controller);

        let actions = controller.available_actions("DialogueSystem").unwrap();
        let input = actions[0].build_input();
        assert!(controller.process_input("DialogueSystem", &input).unwrap());
        assert_eq!(controller.current_node("DialogueSystem"), Some(farewell));
    }

    #[test]
    fn test_unavailable_response_rejected() {
        let mut controller = Controller::new();
        let (greeting, _, secret, _) = elder(&mut controller);

        let input = DialogueNode::response_input(1);
        assert!(!controller.process_input("DialogueSystem", &input).unwrap());
        assert_eq!(controller.current_node("DialogueSystem"), Some(greeting));

        controller.context_mut().player.learn_fact("ruins");
        assert!(controller.process_input("DialogueSystem", &input).unwrap());
        assert_eq!(controller.current_node("DialogueSystem"), Some(secret));
    }

    #[test]
    fn test_out_of_range_response_falls_back_to_rules() {
        let mut controller = Controller::new();
        let (greeting, _, _, gone) = elder(&mut controller);

        let input = DialogueNode::response_input(7);
        assert!(!controller.process_input("DialogueSystem", &input).unwrap());
        assert_eq!(controller.current_node("DialogueSystem"), Some(greeting));

        assert!(controller.process_input("DialogueSystem", &Input::new("leave")).unwrap());
        assert_eq!(controller.current_node("DialogueSystem"), Some(gone));
    }

    #[test]
    fn test_response_effect_applied_on_exit() {
        let mut controller = Controller::new();
        let bribed = controller.create_plain_node("bribed");
        let refused = controller.create_plain_node("refused");
        let walked = controller.create_plain_node("walked");
        let guard = controller.create_node(
            "gate_guard",
            DialogueNode::new("Guard", "Halt.")
                .with_dialogue_response(
                    DialogueResponse::new("Here, take this gold.", bribed).with_effect(
                        |ctx: &mut GameContext| {
                            ctx.inventory.gold -= 10;
                            ctx.player.change_faction_reputation("guards", -5);
                        },
                    ),
                )
                .with_response("No.", refused),
        );
        controller
            .add_transition(guard, guards::input_type("leave"), walked, "Walk away")
            .unwrap();
        controller.set_system_root("DialogueSystem", guard).unwrap();
        controller.context_mut().inventory.gold = 25;

        assert!(controller
            .process_input("DialogueSystem", &DialogueNode::response_input(0))
            .unwrap());
        assert_eq!(controller.current_node("DialogueSystem"), Some(bribed));
        assert_eq!(controller.context().inventory.gold, 15);
        assert!(!controller.context().player.has_faction_reputation("guards", 0));
    }

    #[test]
    fn test_effect_skipped_for_other_exits() {
        let mut controller = Controller::new();
        let bribed = controller.create_plain_node("bribed");
        let refused = controller.create_plain_node("refused");
        let walked = controller.create_plain_node("walked");
        let node = || {
            DialogueNode::new("Guard", "Halt.")
                .with_dialogue_response(
                    DialogueResponse::new("Bribe", bribed)
                        .with_effect(|ctx: &mut GameContext| ctx.inventory.gold -= 10),
                )
                .with_response("No.", refused)
        };
        let by_response = controller.create_node("guard_a", node());
        let by_rule = controller.create_node("guard_b", node());
        controller
            .add_transition(by_rule, guards::input_type("leave"), walked, "Walk away")
            .unwrap();
        controller.set_system_root("A", by_response).unwrap();
        controller.set_system_root("B", by_rule).unwrap();
        controller.context_mut().inventory.gold = 25;

        controller
            .process_input("A", &DialogueNode::response_input(1))
            .unwrap();
        assert_eq!(controller.current_node("A"), Some(refused));

        // A rejected response followed by a rule exit does not pay either.
        controller
            .process_input("B", &DialogueNode::response_input(9))
            .unwrap();
        controller.process_input("B", &Input::new("leave")).unwrap();
        assert_eq!(controller.current_node("B"), Some(walked));

        assert_eq!(controller.context().inventory.gold, 25);
    }
}
