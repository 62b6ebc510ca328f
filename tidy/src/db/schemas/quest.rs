//! Quest document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use tidy_ledger::{LedgerError, OwnerId, Quest, QuestType, Result};

use super::{from_stored, required, to_stored};
use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for quests
pub const QUEST_COLLECTION: &str = "quests";

/// Quest document stored in MongoDB. Counters are i64 so `$max` applies.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct QuestDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// `created_at` doubles as the quest's creation time
    #[serde(default)]
    pub metadata: Metadata,

    pub owner_id: String,
    pub quest_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// daily, weekly, monthly or special
    pub quest_type: String,
    pub target_value: i64,
    #[serde(default)]
    pub current_progress: i64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_claimed: bool,
    pub reward: i64,
    #[serde(default)]
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<DateTime>,
}

impl QuestDoc {
    /// Build a document for an owner's quest.
    pub fn from_quest(owner: &OwnerId, quest: &Quest) -> Result<Self> {
        Ok(Self {
            _id: None,
            metadata: Metadata::created(DateTime::from_chrono(quest.created_at)),
            owner_id: owner.to_string(),
            quest_id: quest.id.clone(),
            title: quest.title.clone(),
            description: quest.description.clone(),
            quest_type: quest.quest_type.as_str().to_string(),
            target_value: i64::from(quest.target_value),
            current_progress: i64::from(quest.current_progress),
            is_completed: quest.is_completed,
            is_claimed: quest.is_claimed,
            reward: to_stored(quest.reward, "reward")?,
            order: i64::from(quest.order),
            expires_at: quest.expires_at.map(DateTime::from_chrono),
            claimed_at: quest.claimed_at.map(DateTime::from_chrono),
        })
    }
}

impl TryFrom<QuestDoc> for Quest {
    type Error = LedgerError;

    fn try_from(doc: QuestDoc) -> Result<Self> {
        let quest_type: QuestType = doc.quest_type.parse().map_err(LedgerError::InvalidRecord)?;
        let created_at = required(doc.metadata.created_at, "quest created_at")?;

        let quest = Quest {
            id: doc.quest_id,
            title: doc.title,
            description: doc.description,
            quest_type,
            target_value: from_stored(doc.target_value, "target_value")?,
            current_progress: from_stored(doc.current_progress, "current_progress")?,
            is_completed: doc.is_completed,
            is_claimed: doc.is_claimed,
            reward: from_stored(doc.reward, "reward")?,
            order: from_stored(doc.order, "order")?,
            expires_at: doc.expires_at.map(|d| d.to_chrono()),
            created_at: created_at.to_chrono(),
            claimed_at: doc.claimed_at.map(|d| d.to_chrono()),
        };
        quest.validate()?;
        Ok(quest)
    }
}

impl IntoIndexes for QuestDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner_id": 1, "quest_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_quest_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for QuestDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tidy_ledger::default_templates;

    #[test]
    fn test_quest_document_conversion() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let quest = default_templates()[2].instantiate(now);

        let doc = QuestDoc::from_quest(&OwnerId::new("family"), &quest).unwrap();
        assert_eq!(doc.quest_type, "weekly");
        assert_eq!(doc.owner_id, "family");

        let back = Quest::try_from(doc).unwrap();
        assert_eq!(back, quest);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let now = Utc::now();
        let quest = default_templates()[0].instantiate(now);
        let mut doc = QuestDoc::from_quest(&OwnerId::new("family"), &quest).unwrap();
        doc.quest_type = "yearly".to_string();

        assert!(matches!(Quest::try_from(doc), Err(LedgerError::InvalidRecord(_))));
    }

    #[test]
    fn test_negative_progress_rejected() {
        let quest = default_templates()[0].instantiate(Utc::now());
        let mut doc = QuestDoc::from_quest(&OwnerId::new("family"), &quest).unwrap();
        doc.current_progress = -1;

        assert!(Quest::try_from(doc).is_err());
    }

    #[test]
    fn test_zero_target_rejected() {
        let quest = default_templates()[0].instantiate(Utc::now());
        let mut doc = QuestDoc::from_quest(&OwnerId::new("family"), &quest).unwrap();
        doc.target_value = 0;

        assert!(Quest::try_from(doc).is_err());
    }
}
