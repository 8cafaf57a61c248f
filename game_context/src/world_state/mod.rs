//! World state - time, flags and the coarse state of places and factions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::mechanics::Season;

/// State returned for locations and factions that were never set.
pub const UNKNOWN_STATE: &str = "unknown";

/// The world facet of the shared context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorldState {
    /// Days elapsed since the start of the game. Persisted with every save.
    pub days_passed: u32,

    pub season: Season,

    /// Location name -> state (e.g. "peaceful", "occupied").
    pub location_states: BTreeMap<String, String>,

    /// Faction name -> state (e.g. "aggressive").
    pub faction_states: BTreeMap<String, String>,

    /// Global boolean flags such as "war_active".
    pub world_flags: BTreeMap<String, bool>,
}

impl WorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a flag. Missing flags are false.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.world_flags.get(flag).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, flag: impl Into<String>, value: bool) {
        self.world_flags.insert(flag.into(), value);
    }

    pub fn location_state(&self, location: &str) -> &str {
        self.location_states
            .get(location)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_STATE)
    }

    pub fn set_location_state(&mut self, location: impl Into<String>, state: impl Into<String>) {
        self.location_states.insert(location.into(), state.into());
    }

    pub fn faction_state(&self, faction: &str) -> &str {
        self.faction_states
            .get(faction)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_STATE)
    }

    pub fn set_faction_state(&mut self, faction: impl Into<String>, state: impl Into<String>) {
        self.faction_states.insert(faction.into(), state.into());
    }

    /// Set the day counter; the season follows from it.
    pub fn set_days_passed(&mut self, days: u32) {
        self.days_passed = days;
        self.season = Season::for_day(days);
    }

    /// Advance one day. The season rolls over every 90 days.
    pub fn advance_day(&mut self) {
        self.set_days_passed(self.days_passed + 1);
    }

    /// Advance several days at once.
    pub fn advance_days(&mut self, days: u32) {
        for _ in 0..days {
            self.advance_day();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_default_to_false() {
        let mut world = WorldState::new();
        assert!(!world.has_flag("war_active"));

        world.set_flag("war_active", true);
        assert!(world.has_flag("war_active"));

        world.set_flag("war_active", false);
        assert!(!world.has_flag("war_active"));
    }

    #[test]
    fn test_unknown_states() {
        let mut world = WorldState::new();
        assert_eq!(world.location_state("castle"), UNKNOWN_STATE);

        world.set_location_state("castle", "occupied");
        world.set_faction_state("bandits", "aggressive");

        assert_eq!(world.location_state("castle"), "occupied");
        assert_eq!(world.faction_state("bandits"), "aggressive");
        assert_eq!(world.faction_state("merchants"), UNKNOWN_STATE);
    }

    #[test]
    fn test_advance_day_rolls_season() {
        let mut world = WorldState::new();

        world.advance_days(89);
        assert_eq!(world.days_passed, 89);
        assert_eq!(world.season, Season::Spring);

        world.advance_day();
        assert_eq!(world.season, Season::Summer);

        world.advance_days(270);
        assert_eq!(world.days_passed, 360);
        assert_eq!(world.season, Season::Spring);
    }

    #[test]
    fn test_set_days_passed_derives_season() {
        let mut world = WorldState::new();

        world.set_days_passed(100);
        assert_eq!(world.season, Season::Summer);

        world.advance_days(169);
        assert_eq!(world.days_passed, 269);
        assert_eq!(world.season, Season::Autumn);

        world.advance_day();
        assert_eq!(world.season, Season::Winter);

        world.set_days_passed(3);
        assert_eq!(world.season, Season::Spring);
    }
}
