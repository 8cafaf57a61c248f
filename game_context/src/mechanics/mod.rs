//! Game mechanics shared across subsystems: seasons, attributes and quest status.

use serde::{Deserialize, Serialize};

/// Days in one season.
pub const DAYS_PER_SEASON: u32 = 90;

/// Seasons of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// The season that follows this one.
    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// The season in effect `days` days after the start of the game.
    pub fn for_day(days: u32) -> Self {
        match (days / DAYS_PER_SEASON) % 4 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Character attributes for modifier calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

/// Lifecycle of a quest as recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuestStatus {
    #[default]
    Available,
    Active,
    Completed,
    Failed,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Check if the quest can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_cycle() {
        let mut season = Season::Spring;
        for expected in [Season::Summer, Season::Autumn, Season::Winter, Season::Spring] {
            season = season.next();
            assert_eq!(season, expected);
        }
    }

    #[test]
    fn test_season_for_day() {
        assert_eq!(Season::for_day(0), Season::Spring);
        assert_eq!(Season::for_day(89), Season::Spring);
        assert_eq!(Season::for_day(90), Season::Summer);
        assert_eq!(Season::for_day(200), Season::Autumn);
        assert_eq!(Season::for_day(359), Season::Winter);
        assert_eq!(Season::for_day(360), Season::Spring);
    }

    #[test]
    fn test_quest_status_terminal() {
        assert!(!QuestStatus::Available.is_terminal());
        assert!(!QuestStatus::Active.is_terminal());
        assert!(QuestStatus::Completed.is_terminal());
        assert!(QuestStatus::Failed.is_terminal());
        assert_eq!(QuestStatus::Active.to_string(), "Active");
    }
}
