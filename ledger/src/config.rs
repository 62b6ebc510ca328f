//! Ledger reward policy.

use serde::{Deserialize, Serialize};

use crate::quest::{default_templates, QuestTemplate};

/// Coins credited for each first-time chore completion.
pub const DEFAULT_CHORE_REWARD: u64 = 10;

/// Reward policy for a ledger instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Coins credited per first-time chore completion (0 disables chore pay)
    pub chore_reward: u64,
    /// Append credits and debits to the transaction history
    pub record_transactions: bool,
    /// Quests seeded by `initialize_quests`
    pub quest_templates: Vec<QuestTemplate>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            chore_reward: DEFAULT_CHORE_REWARD,
            record_transactions: true,
            quest_templates: default_templates(),
        }
    }
}

impl LedgerConfig {
    /// Set the per-chore reward.
    pub fn with_chore_reward(mut self, reward: u64) -> Self {
        self.chore_reward = reward;
        self
    }

    /// Load config from YAML; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
