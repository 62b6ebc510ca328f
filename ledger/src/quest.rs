//! Quest progress, claiming rules and the per-period quest templates.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::types::{Quest, QuestStatus, QuestType};

impl Quest {
    /// Current lifecycle position.
    pub fn status(&self) -> QuestStatus {
        if self.is_claimed {
            QuestStatus::Claimed
        } else if self.is_completed {
            QuestStatus::Claimable
        } else {
            QuestStatus::InProgress
        }
    }

    /// Unclaimed quests are still active.
    pub fn is_active(&self) -> bool {
        !self.is_claimed
    }

    pub fn is_claimable(&self) -> bool {
        self.is_completed && !self.is_claimed
    }

    /// Advance progress by `steps`. Returns true if this call reached the target.
    ///
    /// Completion is sticky: once reached it is never recomputed to false.
    pub fn advance(&mut self, steps: u32) -> bool {
        let was_completed = self.is_completed;
        self.current_progress = self.current_progress.saturating_add(steps);
        self.is_completed = was_completed || self.current_progress >= self.target_value;
        self.is_completed && !was_completed
    }

    /// Check a claim against the quest state and mark it claimed.
    ///
    /// Returns the reward to credit.
    pub fn claim(&mut self, now: DateTime<Utc>) -> Result<u64> {
        check_claimable(self)?;
        self.is_claimed = true;
        self.claimed_at = Some(now);
        Ok(self.reward)
    }

    /// Check the record invariants.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(LedgerError::InvalidRecord("quest id is empty".to_string()));
        }
        if self.target_value == 0 {
            return Err(LedgerError::InvalidRecord(format!(
                "quest '{}' has a zero target",
                self.id
            )));
        }
        if self.is_claimed && !self.is_completed {
            return Err(LedgerError::InvalidRecord(format!(
                "quest '{}' is claimed but not completed",
                self.id
            )));
        }
        if self.current_progress >= self.target_value && !self.is_completed {
            return Err(LedgerError::InvalidRecord(format!(
                "quest '{}' reached its target but is not completed",
                self.id
            )));
        }
        Ok(())
    }
}

/// Claim preconditions shared by the ledger and store implementations.
pub fn check_claimable(quest: &Quest) -> Result<()> {
    if !quest.is_completed {
        return Err(LedgerError::NotReady(quest.id.clone()));
    }
    if quest.is_claimed {
        return Err(LedgerError::AlreadyClaimed(quest.id.clone()));
    }
    Ok(())
}

/// Sort quests for display: by type (daily first), then by `order`.
pub fn sort_quests(quests: &mut [Quest]) {
    quests.sort_by(|a, b| {
        a.quest_type
            .rank()
            .cmp(&b.quest_type.rank())
            .then(a.order.cmp(&b.order))
    });
}

/// Blueprint for a quest seeded at the start of each period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestTemplate {
    /// Fixed id; seeding skips templates whose id already exists
    pub id: String,
    pub title: String,
    pub description: String,
    pub quest_type: QuestType,
    pub reward: u64,
    pub target_value: u32,
    pub order: u32,
}

impl QuestTemplate {
    /// Build a fresh quest from this template.
    pub fn instantiate(&self, now: DateTime<Utc>) -> Quest {
        Quest {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            quest_type: self.quest_type,
            target_value: self.target_value,
            current_progress: 0,
            is_completed: false,
            is_claimed: false,
            reward: self.reward,
            order: self.order,
            expires_at: expiry_for(self.quest_type, now),
            created_at: now,
            claimed_at: None,
        }
    }

    fn new(
        id: &str,
        title: &str,
        description: &str,
        quest_type: QuestType,
        reward: u64,
        target_value: u32,
        order: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            quest_type,
            reward,
            target_value,
            order,
        }
    }
}

/// When a quest of the given type created at `now` expires.
///
/// Daily quests end at the next UTC midnight, weekly quests seven days out,
/// monthly quests thirty days out. Special quests do not expire.
pub fn expiry_for(quest_type: QuestType, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match quest_type {
        QuestType::Daily => {
            let tomorrow = now.date_naive().succ_opt()?;
            Some(tomorrow.and_hms_opt(0, 0, 0)?.and_utc())
        }
        QuestType::Weekly => Some(now + Duration::days(7)),
        QuestType::Monthly => Some(now + Duration::days(30)),
        QuestType::Special => None,
    }
}

/// The daily and weekly quests every owner starts a period with.
pub fn default_templates() -> Vec<QuestTemplate> {
    vec![
        QuestTemplate::new(
            "daily_1_chore",
            "Daily Challenge",
            "Complete 1 chore today",
            QuestType::Daily,
            1,
            1,
            1,
        ),
        QuestTemplate::new(
            "daily_3_chores",
            "Daily Challenge",
            "Complete 3 chores today",
            QuestType::Daily,
            5,
            3,
            2,
        ),
        QuestTemplate::new(
            "weekly_5_chores",
            "Weekly Goal",
            "Complete 5 chores this week",
            QuestType::Weekly,
            3,
            5,
            1,
        ),
        QuestTemplate::new(
            "weekly_10_chores",
            "Weekly Goal",
            "Complete 10 chores this week",
            QuestType::Weekly,
            10,
            10,
            2,
        ),
        QuestTemplate::new(
            "weekly_20_chores",
            "Weekly Goal",
            "Complete 20+ chores this week",
            QuestType::Weekly,
            20,
            20,
            3,
        ),
    ]
}
