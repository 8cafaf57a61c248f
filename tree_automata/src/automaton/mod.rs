//! The automaton building blocks: identity, values, inputs, guards and nodes.

pub mod guards;
mod identity;
mod input;
mod node;
mod value;

pub use identity::*;
pub use input::*;
pub use node::*;
pub use value::*;
