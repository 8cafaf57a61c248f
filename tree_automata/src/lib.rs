//! # Tree Automata
//!
//! The engine behind quests, dialogue and other branching game systems.
//! Each system is a tree of nodes; the controller keeps one current node
//! per system and moves it when an input matches a transition rule.
//!
//! ## Core Components
//!
//! - **automaton**: Nodes, transition rules, inputs, actions and node identity
//! - **controller**: Arena of nodes, named systems, input processing and hierarchy queries
//! - **kinds**: Quest and dialogue node behaviors
//! - **persistence**: Save/load of current nodes by persistent id
//!
//! Game state lives in [`game_context::GameContext`], which the controller
//! owns and lends to guards (read-only) and hooks (mutable).

pub mod automaton;
pub mod controller;
pub mod error;
pub mod kinds;
pub mod persistence;

pub use automaton::*;
pub use controller::*;
pub use error::*;
pub use kinds::*;
pub use persistence::*;
