//! Inputs fed into nodes, and the player-facing actions that build them.

use serde::{Deserialize, Serialize};

use super::value::{ScalarValue, StateData};

/// Input type built by the default per-rule actions.
pub const CHOICE_INPUT: &str = "transition";

/// Parameter holding the chosen index in choice-style inputs.
pub const INDEX_PARAM: &str = "index";

/// A tagged event fed into a node to attempt a transition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Input {
    #[serde(rename = "type")]
    pub input_type: String,
    #[serde(default)]
    pub parameters: StateData,
}

impl Input {
    pub fn new(input_type: impl Into<String>) -> Self {
        Self {
            input_type: input_type.into(),
            parameters: StateData::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// The input a default per-rule action builds for rule `index`.
    pub fn choice(index: usize) -> Self {
        Self::new(CHOICE_INPUT).with_param(INDEX_PARAM, index)
    }

    pub fn is(&self, input_type: &str) -> bool {
        self.input_type == input_type
    }

    pub fn param(&self, key: &str) -> Option<&ScalarValue> {
        self.parameters.get(key)
    }

    /// The `index` parameter, if present and a non-negative int.
    pub fn index(&self) -> Option<usize> {
        self.param(INDEX_PARAM)
            .and_then(ScalarValue::as_int)
            .and_then(|index| usize::try_from(index).ok())
    }
}

/// A player-facing choice.
///
/// Building the input runs no game logic; the input only has an effect
/// once it is fed back into the node through the controller.
pub struct Action {
    pub name: String,
    pub description: String,
    build: Box<dyn Fn() -> Input>,
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        build: impl Fn() -> Input + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            build: Box::new(build),
        }
    }

    /// Manufacture the input this action stands for.
    pub fn build_input(&self) -> Input {
        (self.build)()
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_builder() {
        let input = Input::new("action")
            .with_param("name", "open_door")
            .with_param("force", 3);

        assert!(input.is("action"));
        assert_eq!(input.param("name").and_then(ScalarValue::as_text), Some("open_door"));
        assert_eq!(input.param("force").and_then(ScalarValue::as_int), Some(3));
        assert!(input.param("missing").is_none());
    }

    #[test]
    fn test_choice_input() {
        let input = Input::choice(2);
        assert!(input.is(CHOICE_INPUT));
        assert_eq!(input.index(), Some(2));

        let negative = Input::new(CHOICE_INPUT).with_param(INDEX_PARAM, -1);
        assert_eq!(negative.index(), None);
    }

    #[test]
    fn test_action_builds_input() {
        let action = Action::new("go_north", "Walk north", || {
            Input::new("move").with_param("direction", "north")
        });

        assert_eq!(action.build_input(), action.build_input());
        assert_eq!(
            action.build_input().param("direction"),
            Some(&ScalarValue::from("north"))
        );
        assert!(format!("{action:?}").contains("go_north"));
    }
}
