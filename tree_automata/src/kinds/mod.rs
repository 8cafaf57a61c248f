//! Reference node kinds built on [`NodeBehavior`](crate::automaton::NodeBehavior).

mod dialogue;
mod quest;

pub use dialogue::*;
pub use quest::*;
