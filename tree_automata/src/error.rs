//! Error types for the automaton engine.

use thiserror::Error;

use crate::automaton::NodeId;

/// Lookup failures on the controller. Never fatal: the call that
/// reports one has made no state change.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// No root is registered under this system name.
    #[error("system not found: {0}")]
    SystemNotFound(String),

    /// The id was not issued by this controller.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}

/// Failures while saving or loading controller state.
///
/// A failed load applies nothing.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed binary save data: {0}")]
    Binary(#[from] bincode::Error),

    #[error("malformed json save data: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON has no encoding for NaN or infinities.
    #[error("state value {key:?} of system {system:?} is not a finite number")]
    NonFiniteValue { system: String, key: String },
}
