//! Ready-made transition guards.
//!
//! Guards are plain closures over the input and a read-only view of the
//! context. Anything that needs to change state belongs in a node's
//! `on_enter`/`on_exit` hooks instead.

use game_context::GameContext;

use super::input::{Input, CHOICE_INPUT};
use super::value::ScalarValue;

/// Matches every input.
pub fn always() -> impl Fn(&Input, &GameContext) -> bool {
    |_: &Input, _: &GameContext| true
}

/// Matches nothing.
pub fn never() -> impl Fn(&Input, &GameContext) -> bool {
    |_: &Input, _: &GameContext| false
}

/// Matches inputs of the given type.
pub fn input_type(expected: &str) -> impl Fn(&Input, &GameContext) -> bool {
    let expected = expected.to_string();
    move |input: &Input, _: &GameContext| input.input_type == expected
}

/// Matches inputs whose parameter `key` equals `value`, whatever the input type.
pub fn param_equals(key: &str, value: ScalarValue) -> impl Fn(&Input, &GameContext) -> bool {
    let key = key.to_string();
    move |input: &Input, _: &GameContext| input.param(&key) == Some(&value)
}

/// Matches an input of type `input_type` with `key == value`.
pub fn typed_param(
    input_type: &str,
    key: &str,
    value: ScalarValue,
) -> impl Fn(&Input, &GameContext) -> bool {
    let input_type = input_type.to_string();
    let key = key.to_string();
    move |input: &Input, _: &GameContext| {
        input.input_type == input_type && input.param(&key) == Some(&value)
    }
}

/// Matches the input built by the default action for rule `index`.
pub fn choice(index: usize) -> impl Fn(&Input, &GameContext) -> bool {
    move |input: &Input, _: &GameContext| input.is(CHOICE_INPUT) && input.index() == Some(index)
}

/// Matches any input once the player knows `fact`.
pub fn requires_fact(fact: &str) -> impl Fn(&Input, &GameContext) -> bool {
    let fact = fact.to_string();
    move |_: &Input, context: &GameContext| context.player.knows(&fact)
}

/// Matches when both guards match.
pub fn both<A, B>(a: A, b: B) -> impl Fn(&Input, &GameContext) -> bool
where
    A: Fn(&Input, &GameContext) -> bool,
    B: Fn(&Input, &GameContext) -> bool,
{
    move |input: &Input, context: &GameContext| a(input, context) && b(input, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_and_never() {
        let context = GameContext::new();
        let input = Input::new("anything");

        assert!(always()(&input, &context));
        assert!(!never()(&input, &context));
    }

    #[test]
    fn test_input_type() {
        let context = GameContext::new();
        let guard = input_type("talk");

        assert!(guard(&Input::new("talk"), &context));
        assert!(!guard(&Input::new("walk"), &context));
    }

    #[test]
    fn test_param_guards() {
        let context = GameContext::new();
        let input = Input::new("action").with_param("name", "abandon");

        assert!(param_equals("name", "abandon".into())(&input, &context));
        assert!(!param_equals("name", "accept".into())(&input, &context));
        assert!(typed_param("action", "name", "abandon".into())(&input, &context));
        assert!(!typed_param("quest_action", "name", "abandon".into())(&input, &context));
    }

    #[test]
    fn test_choice() {
        let context = GameContext::new();
        let guard = choice(1);

        assert!(guard(&Input::choice(1), &context));
        assert!(!guard(&Input::choice(0), &context));
        assert!(!guard(&Input::new("other").with_param("index", 1), &context));
    }

    #[test]
    fn test_requires_fact() {
        let mut context = GameContext::new();
        let guard = both(input_type("enter"), requires_fact("secret_door"));
        let input = Input::new("enter");

        assert!(!guard(&input, &context));

        context.player.learn_fact("secret_door");
        assert!(guard(&input, &context));
        assert!(!guard(&Input::new("leave"), &context));
    }
}
