//! The player's character sheet and belongings.

mod character;
mod components;

pub use character::*;
pub use components::*;
