//! Loading an initial game context from TOML.
//!
//! Every table is optional. `season` may be omitted; when given it must
//! agree with `days_passed`.
//!
//! ```toml
//! [player]
//! strength = 14
//! known_facts = ["old_road"]
//!
//! [player.skills]
//! stealth = 2
//!
//! [player.factions]
//! bandits = -50
//!
//! [world]
//! days_passed = 93
//! season = "summer"
//!
//! [world.flags]
//! war_active = true
//!
//! [world.locations]
//! village = "peaceful"
//!
//! [world.factions]
//! bandits = "aggressive"
//!
//! [inventory]
//! gold = 25
//!
//! [[inventory.items]]
//! id = "torch"
//! name = "Torch"
//! quantity = 2
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::context::GameContext;
use crate::entities::{CharacterStats, Inventory, Item};
use crate::error::ContextError;
use crate::mechanics::Season;
use crate::world_state::WorldState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ContextConfig {
    player: PlayerConfig,
    world: WorldConfig,
    inventory: InventoryConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PlayerConfig {
    strength: i32,
    dexterity: i32,
    constitution: i32,
    intelligence: i32,
    wisdom: i32,
    charisma: i32,
    experience: i32,
    skills: BTreeMap<String, i32>,
    factions: BTreeMap<String, i32>,
    known_facts: BTreeSet<String>,
    abilities: BTreeSet<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let stats = CharacterStats::default();
        Self {
            strength: stats.strength,
            dexterity: stats.dexterity,
            constitution: stats.constitution,
            intelligence: stats.intelligence,
            wisdom: stats.wisdom,
            charisma: stats.charisma,
            experience: stats.experience,
            skills: BTreeMap::new(),
            factions: BTreeMap::new(),
            known_facts: BTreeSet::new(),
            abilities: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WorldConfig {
    days_passed: u32,
    season: Option<Season>,
    flags: BTreeMap<String, bool>,
    locations: BTreeMap<String, String>,
    factions: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InventoryConfig {
    gold: i32,
    items: Vec<Item>,
}

impl GameContext {
    /// Build a context from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ContextError> {
        let config: ContextConfig = toml::from_str(text)?;
        config.into_context()
    }
}

impl ContextConfig {
    fn into_context(self) -> Result<GameContext, ContextError> {
        let player = CharacterStats {
            strength: self.player.strength,
            dexterity: self.player.dexterity,
            constitution: self.player.constitution,
            intelligence: self.player.intelligence,
            wisdom: self.player.wisdom,
            charisma: self.player.charisma,
            experience: self.player.experience,
            skills: self.player.skills,
            faction_reputation: self.player.factions,
            known_facts: self.player.known_facts,
            unlocked_abilities: self.player.abilities,
        };

        let mut world = WorldState {
            location_states: self.world.locations,
            faction_states: self.world.factions,
            world_flags: self.world.flags,
            ..WorldState::default()
        };
        world.set_days_passed(self.world.days_passed);
        if let Some(season) = self.world.season {
            if season != world.season {
                return Err(ContextError::InvalidValue {
                    field: "world.season".to_string(),
                    reason: format!(
                        "day {} falls in {}, not {}",
                        world.days_passed,
                        world.season.as_str(),
                        season.as_str()
                    ),
                });
            }
        }

        let mut inventory = Inventory {
            gold: self.inventory.gold,
            ..Inventory::default()
        };
        for item in self.inventory.items {
            if item.quantity <= 0 {
                return Err(ContextError::InvalidValue {
                    field: format!("inventory.items.{}.quantity", item.id),
                    reason: format!("must be positive, got {}", item.quantity),
                });
            }
            inventory.add_item(item);
        }

        Ok(GameContext {
            player,
            world,
            inventory,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_is_default() {
        let context = GameContext::from_toml_str("").unwrap();
        assert_eq!(context, GameContext::default());
    }

    #[test]
    fn test_full_document() {
        let text = r#"
            [player]
            strength = 14
            known_facts = ["old_road"]

            [player.skills]
            stealth = 2

            [player.factions]
            bandits = -50

            [world]
            days_passed = 93
            season = "summer"

            [world.flags]
            war_active = true

            [world.locations]
            village = "peaceful"

            [inventory]
            gold = 40

            [[inventory.items]]
            id = "torch"
            name = "Torch"
            quantity = 2

            [[inventory.items]]
            id = "torch"
            name = "Torch"
        "#;

        let context = GameContext::from_toml_str(text).unwrap();

        assert_eq!(context.player.strength, 14);
        assert_eq!(context.player.dexterity, 10);
        assert!(context.player.knows("old_road"));
        assert!(context.player.has_skill("stealth", 2));
        assert!(!context.player.has_faction_reputation("bandits", 0));
        assert_eq!(context.world.days_passed, 93);
        assert_eq!(context.world.season, Season::Summer);
        assert!(context.world.has_flag("war_active"));
        assert_eq!(context.world.location_state("village"), "peaceful");
        assert_eq!(context.inventory.quantity("torch"), 3);
        assert_eq!(context.inventory.gold, 40);
    }

    #[test]
    fn test_malformed_document() {
        let result = GameContext::from_toml_str("[player\nstrength = ");
        assert!(matches!(result, Err(ContextError::Config(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = GameContext::from_toml_str("[player]\nluck = 3");
        assert!(matches!(result, Err(ContextError::Config(_))));
    }

    #[test]
    fn test_season_follows_days_passed() {
        let context = GameContext::from_toml_str("[world]\ndays_passed = 200").unwrap();
        assert_eq!(context.world.season, Season::Autumn);

        let result = GameContext::from_toml_str("[world]\ndays_passed = 200\nseason = \"spring\"");
        assert!(matches!(
            result,
            Err(ContextError::InvalidValue { ref field, .. }) if field == "world.season"
        ));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let text = r#"
            [[inventory.items]]
            id = "torch"
            name = "Torch"
            quantity = 0
        "#;

        let result = GameContext::from_toml_str(text);
        assert!(matches!(result, Err(ContextError::InvalidValue { .. })));
    }
}
