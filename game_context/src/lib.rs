//! # Game Context
//!
//! The shared state every automaton hook and guard sees: the player's
//! character stats, the world, the inventory and the journals.
//! This crate holds data and small helpers only; it knows nothing about
//! the automaton that drives it.
//!
//! The context is split into facets so that a subsystem which only reads
//! world flags does not depend on inventory or journal fields.

pub mod config;
pub mod context;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod world_state;

pub use config::*;
pub use context::*;
pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use world_state::*;
