//! Character statistics used by quests, dialogue requirements and progression.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::mechanics::Attribute;

/// The player's character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,

    pub experience: i32,

    /// Skill name -> level.
    pub skills: BTreeMap<String, i32>,

    /// Faction name -> reputation score.
    pub faction_reputation: BTreeMap<String, i32>,

    /// Facts the character has learned. Persisted with every save.
    pub known_facts: BTreeSet<String>,

    pub unlocked_abilities: BTreeSet<String>,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
            experience: 0,
            skills: BTreeMap::new(),
            faction_reputation: BTreeMap::new(),
            known_facts: BTreeSet::new(),
            unlocked_abilities: BTreeSet::new(),
        }
    }
}

impl CharacterStats {
    /// Create a character sheet with every attribute at 10 and nothing learned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of an attribute.
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Constitution => self.constitution,
            Attribute::Intelligence => self.intelligence,
            Attribute::Wisdom => self.wisdom,
            Attribute::Charisma => self.charisma,
        }
    }

    /// Calculate modifier for a given attribute ((value - 10) / 2).
    pub fn modifier(&self, attribute: Attribute) -> i32 {
        (self.attribute(attribute) - 10) / 2
    }

    pub fn gain_experience(&mut self, amount: i32) {
        self.experience += amount;
    }

    /// Check if a skill is at or above `min_level`. Unknown skills never pass.
    pub fn has_skill(&self, skill: &str, min_level: i32) -> bool {
        self.skills.get(skill).is_some_and(|level| *level >= min_level)
    }

    /// Check if reputation with a faction is at or above `min_reputation`.
    pub fn has_faction_reputation(&self, faction: &str, min_reputation: i32) -> bool {
        self.faction_reputation
            .get(faction)
            .is_some_and(|rep| *rep >= min_reputation)
    }

    pub fn knows(&self, fact: &str) -> bool {
        self.known_facts.contains(fact)
    }

    pub fn has_ability(&self, ability: &str) -> bool {
        self.unlocked_abilities.contains(ability)
    }

    /// Learn a fact. Returns false if it was already known.
    pub fn learn_fact(&mut self, fact: impl Into<String>) -> bool {
        self.known_facts.insert(fact.into())
    }

    pub fn unlock_ability(&mut self, ability: impl Into<String>) -> bool {
        self.unlocked_abilities.insert(ability.into())
    }

    /// Raise (or lower, with a negative amount) a skill. Missing skills start at 0.
    pub fn improve_skill(&mut self, skill: impl Into<String>, amount: i32) {
        *self.skills.entry(skill.into()).or_insert(0) += amount;
    }

    pub fn change_faction_reputation(&mut self, faction: impl Into<String>, amount: i32) {
        *self.faction_reputation.entry(faction.into()).or_insert(0) += amount;
    }
}
