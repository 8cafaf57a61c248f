//! The umbrella handle passed into every hook and guard.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{CharacterStats, Inventory};
use crate::mechanics::QuestStatus;
use crate::world_state::WorldState;

/// Quest and dialogue records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Journal {
    /// Quest name -> status.
    pub quests: BTreeMap<String, QuestStatus>,

    /// Dialogue node name -> the text last shown there.
    pub dialogue: BTreeMap<String, String>,
}

impl Journal {
    pub fn quest_status(&self, quest: &str) -> Option<QuestStatus> {
        self.quests.get(quest).copied()
    }

    pub fn record_quest(&mut self, quest: impl Into<String>, status: QuestStatus) {
        self.quests.insert(quest.into(), status);
    }

    pub fn record_dialogue(&mut self, node: impl Into<String>, text: impl Into<String>) {
        self.dialogue.insert(node.into(), text.into());
    }
}

/// Everything a node may read in a guard or change in a lifecycle hook.
///
/// Each field is an independent facet; subsystems should touch only the
/// facets they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameContext {
    pub player: CharacterStats,
    pub world: WorldState,
    pub inventory: Inventory,
    pub journal: Journal,
}

impl GameContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_records() {
        let mut context = GameContext::new();
        assert_eq!(context.journal.quest_status("rescue"), None);

        context.journal.record_quest("rescue", QuestStatus::Active);
        context.journal.record_dialogue("greeting", "Well met, traveller.");

        assert_eq!(
            context.journal.quest_status("rescue"),
            Some(QuestStatus::Active)
        );
        assert_eq!(
            context.journal.dialogue.get("greeting").map(String::as_str),
            Some("Well met, traveller.")
        );
    }
}
