//! Family member document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use tidy_ledger::{LedgerError, Member, OwnerId, Result};

use super::required;
use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for members
pub const MEMBER_COLLECTION: &str = "members";

/// Member document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MemberDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// `created_at` is the member's creation time
    #[serde(default)]
    pub metadata: Metadata,

    pub member_id: String,
    pub family_id: String,
    pub name: String,
}

impl TryFrom<MemberDoc> for Member {
    type Error = LedgerError;

    fn try_from(doc: MemberDoc) -> Result<Self> {
        if doc.name.trim().is_empty() {
            return Err(LedgerError::InvalidRecord(format!(
                "member '{}' has no name",
                doc.member_id
            )));
        }

        Ok(Self {
            id: OwnerId::new(doc.member_id),
            family_id: OwnerId::new(doc.family_id),
            name: doc.name,
            created_at: required(doc.metadata.created_at, "member created_at")?.to_chrono(),
        })
    }
}

impl IntoIndexes for MemberDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "member_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("member_id_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "family_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("family_id_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for MemberDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
