//! Core record types for the chore ledger.
//!
//! Field names serialize in camelCase so stored documents keep the shape the
//! household app has always written (`completedBefore`, `targetValue`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an owner: a family or a member account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Chore priority shown next to the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// A single chore on an owner's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    /// Unique within the owner's list
    pub id: String,
    /// Display title
    pub title: String,
    /// Currently checked off
    #[serde(default)]
    pub completed: bool,
    /// Set while completed, cleared when unchecked
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Sticky flag: true once the chore has ever been completed
    #[serde(default)]
    pub completed_before: bool,
    /// When the chore was added
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Quest period type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    Daily,
    Weekly,
    Monthly,
    Special,
}

impl QuestType {
    /// Sort rank used when listing quests (daily first).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 2,
            Self::Monthly => 3,
            Self::Special => 4,
        }
    }

    /// Whether chore completions advance quests of this type.
    ///
    /// Monthly and special quests only move through explicit progress updates.
    pub fn advances_on_chore(&self) -> bool {
        matches!(self, Self::Daily | Self::Weekly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "special" => Ok(Self::Special),
            other => Err(format!("unknown quest type '{}'", other)),
        }
    }
}

/// A progress counter against a target, with a claimable reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    /// Always greater than zero
    pub target_value: u32,
    #[serde(default)]
    pub current_progress: u32,
    /// `current_progress >= target_value`
    #[serde(default)]
    pub is_completed: bool,
    /// Implies `is_completed`
    #[serde(default)]
    pub is_claimed: bool,
    /// Coins credited on claim
    pub reward: u64,
    /// Display order within the quest type
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub claimed_at: Option<DateTime<Utc>>,
}

/// Lifecycle position of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Below target
    InProgress,
    /// Target reached, reward waiting
    Claimable,
    /// Reward paid out; terminal
    Claimed,
}

/// A named family member. Members own their own chore lists and balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: OwnerId,
    pub family_id: OwnerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Direction of a currency movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(format!("unknown transaction kind '{}'", other)),
        }
    }
}

/// Why currency moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionReason {
    ChoreCompleted { chore_id: String },
    QuestClaimed { quest_id: String },
    DecorationPurchased { decoration_id: String },
}

/// Entry in an owner's currency history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyTransaction {
    pub id: String,
    pub owner_id: OwnerId,
    pub kind: TransactionKind,
    pub amount: u64,
    pub reason: TransactionReason,
    pub balance_after: u64,
    pub timestamp: DateTime<Utc>,
}

impl CurrencyTransaction {
    /// Create a transaction stamped now with a fresh id.
    pub fn new(
        owner_id: OwnerId,
        kind: TransactionKind,
        amount: u64,
        reason: TransactionReason,
        balance_after: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            kind,
            amount,
            reason,
            balance_after,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chore_serializes_camel_case() {
        let chore = Chore {
            id: "c1".to_string(),
            title: "Dishes".to_string(),
            completed: false,
            completed_at: None,
            completed_before: true,
            created_at: Utc::now(),
            priority: Priority::High,
            due_date: None,
        };

        let json = serde_json::to_value(&chore).unwrap();
        assert_eq!(json["completedBefore"], true);
        assert_eq!(json["priority"], "high");
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn test_chore_missing_flags_default_false() {
        let json = r#"{"id":"c1","title":"Laundry","createdAt":"2025-01-01T00:00:00Z"}"#;
        let chore: Chore = serde_json::from_str(json).unwrap();

        assert!(!chore.completed);
        assert!(!chore.completed_before);
        assert_eq!(chore.priority, Priority::Medium);
    }

    #[test]
    fn test_quest_type_policy() {
        assert!(QuestType::Daily.advances_on_chore());
        assert!(QuestType::Weekly.advances_on_chore());
        assert!(!QuestType::Monthly.advances_on_chore());
        assert!(!QuestType::Special.advances_on_chore());
        assert!(QuestType::Daily.rank() < QuestType::Special.rank());
    }

    #[test]
    fn test_quest_type_field_renamed() {
        let json = r#"{
            "id": "daily_1_chore",
            "title": "Daily Challenge",
            "type": "daily",
            "targetValue": 1,
            "reward": 1,
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;
        let quest: Quest = serde_json::from_str(json).unwrap();
        assert_eq!(quest.quest_type, QuestType::Daily);
        assert_eq!(quest.current_progress, 0);
        assert!(!quest.is_claimed);
    }

    #[test]
    fn test_transaction_reason_tagged() {
        let reason = TransactionReason::QuestClaimed {
            quest_id: "weekly_5_chores".to_string(),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["type"], "quest_claimed");
        assert_eq!(json["quest_id"], "weekly_5_chores");
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_quest_type_from_str() {
        assert_eq!("Weekly".parse::<QuestType>().unwrap(), QuestType::Weekly);
        assert_eq!(QuestType::Monthly.as_str().parse::<QuestType>().unwrap(), QuestType::Monthly);
        assert!("yearly".parse::<QuestType>().is_err());
    }
}
