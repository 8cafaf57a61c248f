//! The on-disk shape of a save.

use bincode::Options;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use uuid::Uuid;

use crate::automaton::{ScalarValue, StateData};
use crate::error::PersistenceError;

/// Largest binary save accepted. Length prefixes claiming more fail the load.
pub const MAX_SAVE_BYTES: u64 = 64 * 1024 * 1024;

/// A complete save: every registered system, then the context tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Fresh per save. Only used to correlate save and load logs.
    pub snapshot_id: Uuid,
    pub systems: Vec<SystemSnapshot>,
    pub context: ContextSnapshot,
}

/// One system's entry. `current` is `None` for a system that never started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub name: String,
    pub current: Option<CurrentNodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentNodeSnapshot {
    pub persistent_id: String,
    pub node_name: String,
    #[serde(default)]
    pub state_data: StateData,
}

/// The minimal slice of the shared context the engine itself saves.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub days_passed: u32,
    pub known_facts: Vec<String>,
}

/// Encoding of a save stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    /// Compact bincode encoding.
    #[default]
    Binary,
    /// Pretty-printed JSON, for inspection and hand editing.
    Json,
}

impl SaveData {
    /// First saved state value that is NaN or infinite, as `(system, key)`.
    pub fn find_non_finite(&self) -> Option<(&str, &str)> {
        self.systems.iter().find_map(|system| {
            let current = system.current.as_ref()?;
            current
                .state_data
                .iter()
                .find(|(_, value)| matches!(value, ScalarValue::Float(v) if !v.is_finite()))
                .map(|(key, _)| (system.name.as_str(), key.as_str()))
        })
    }
}

fn binary_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(MAX_SAVE_BYTES)
}

impl SaveFormat {
    /// Encode a save. JSON refuses non-finite floats rather than writing a
    /// file that cannot be read back.
    pub fn encode<W: Write>(self, data: &SaveData, writer: W) -> Result<(), PersistenceError> {
        match self {
            SaveFormat::Binary => binary_options().serialize_into(writer, data)?,
            SaveFormat::Json => {
                if let Some((system, key)) = data.find_non_finite() {
                    return Err(PersistenceError::NonFiniteValue {
                        system: system.to_string(),
                        key: key.to_string(),
                    });
                }
                serde_json::to_writer_pretty(writer, data)?
            }
        }
        Ok(())
    }

    /// Decode a whole save. Truncated, oversized or malformed input is an error.
    pub fn decode<R: Read>(self, reader: R) -> Result<SaveData, PersistenceError> {
        let data = match self {
            SaveFormat::Binary => binary_options().deserialize_from(reader)?,
            SaveFormat::Json => serde_json::from_reader(reader)?,
        };
        Ok(data)
    }
}
