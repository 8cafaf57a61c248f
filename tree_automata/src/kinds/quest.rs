//! Quest nodes: journal bookkeeping on enter, rewards on exit.

use game_context::{GameContext, Item, QuestStatus};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::automaton::{Action, Input, NodeBehavior, NodeCore};

/// Input type built by quest-specific actions.
pub const QUEST_ACTION_INPUT: &str = "quest_action";

/// Parameter naming the quest action.
pub const QUEST_ACTION_PARAM: &str = "action";

/// Something granted when an accepting quest node is left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestReward {
    Experience(i32),
    Gold(i32),
    Item { id: String, amount: i32 },
    Faction { faction: String, amount: i32 },
    Skill { skill: String, amount: i32 },
}

impl QuestReward {
    fn grant(&self, context: &mut GameContext) {
        match self {
            QuestReward::Experience(amount) => context.player.gain_experience(*amount),
            QuestReward::Gold(amount) => context.inventory.gold += amount,
            QuestReward::Item { id, amount } => context
                .inventory
                .add_item(Item::new(id.clone(), id.clone(), "quest_reward").with_quantity(*amount)),
            QuestReward::Faction { faction, amount } => {
                context.player.change_faction_reputation(faction.clone(), *amount)
            }
            QuestReward::Skill { skill, amount } => {
                context.player.improve_skill(skill.clone(), *amount)
            }
        }
    }
}

/// A precondition for starting a quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestRequirement {
    Skill { skill: String, level: i32 },
    Item { id: String, quantity: i32 },
    Faction { faction: String, reputation: i32 },
    Knowledge(String),
    WorldFlag(String),
}

impl QuestRequirement {
    pub fn check(&self, context: &GameContext) -> bool {
        match self {
            QuestRequirement::Skill { skill, level } => context.player.has_skill(skill, *level),
            QuestRequirement::Item { id, quantity } => context.inventory.has_item(id, *quantity),
            QuestRequirement::Faction {
                faction,
                reputation,
            } => context.player.has_faction_reputation(faction, *reputation),
            QuestRequirement::Knowledge(fact) => context.player.knows(fact),
            QuestRequirement::WorldFlag(flag) => context.world.has_flag(flag),
        }
    }
}

/// A quest or quest stage.
///
/// Rewards are a function of the node being left: leaving an accepting
/// quest node grants them, leaving one marked failed records the failure.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestNode {
    pub title: String,
    pub description: String,
    pub status: QuestStatus,
    pub rewards: Vec<QuestReward>,
    pub requirements: Vec<QuestRequirement>,
}

impl QuestNode {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status: QuestStatus::Available,
            rewards: Vec::new(),
            requirements: Vec::new(),
        }
    }

    pub fn with_reward(mut self, reward: QuestReward) -> Self {
        self.rewards.push(reward);
        self
    }

    pub fn with_requirement(mut self, requirement: QuestRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Whether every requirement holds.
    pub fn can_access(&self, context: &GameContext) -> bool {
        self.requirements.iter().all(|req| req.check(context))
    }

    /// Mark the quest failed; the failure is journaled when the node is left.
    pub fn fail(&mut self) {
        self.status = QuestStatus::Failed;
    }

    /// The input the "abandon" action builds.
    pub fn abandon_input() -> Input {
        Input::new(QUEST_ACTION_INPUT).with_param(QUEST_ACTION_PARAM, "abandon")
    }
}

impl NodeBehavior for QuestNode {
    fn kind(&self) -> &'static str {
        "quest"
    }

    fn on_enter(&mut self, node: &mut NodeCore, context: &mut GameContext) {
        self.status = QuestStatus::Active;
        context.journal.record_quest(node.name(), QuestStatus::Active);
        info!(quest = %self.title, node = %node.name(), "quest activated");
    }

    fn on_exit(&mut self, node: &mut NodeCore, context: &mut GameContext) {
        if node.is_accepting() {
            self.status = QuestStatus::Completed;
            context.journal.record_quest(node.name(), QuestStatus::Completed);
            for reward in &self.rewards {
                reward.grant(context);
            }
            info!(quest = %self.title, rewards = self.rewards.len(), "quest completed");
        } else if self.status == QuestStatus::Failed {
            context.journal.record_quest(node.name(), QuestStatus::Failed);
            info!(quest = %self.title, "quest failed");
        }
    }

    /// Per-rule actions plus "abandon". Abandoning only does something if a
    /// rule recognizes [`QuestNode::abandon_input`].
    fn available_actions(&self, node: &NodeCore, _context: &GameContext) -> Vec<Action> {
        let mut actions = node.rule_actions();
        actions.push(Action::new(
            "abandon_quest",
            "Abandon this quest",
            QuestNode::abandon_input,
        ));
        actions
    }
}
