//! Owner document schema
//!
//! One document per family or member: chore list, coin balance and the
//! decoration inventory.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use tidy_ledger::{validate_chores, Chore, DecorationInventory, Result};

use super::from_stored;
use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for owners
pub const OWNER_COLLECTION: &str = "owners";

/// Owner document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct OwnerDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Family or member id
    pub owner_id: String,

    #[serde(default)]
    pub chores: Vec<Chore>,

    /// Only ever changed with `$inc`
    #[serde(default)]
    pub currency: i64,

    #[serde(default)]
    pub decorations: DecorationInventory,
}

impl OwnerDoc {
    /// Coin balance; a negative stored value is a corrupt record.
    pub fn balance(&self) -> Result<u64> {
        from_stored(self.currency, "currency")
    }

    /// Validated chore list.
    pub fn into_chores(self) -> Result<Vec<Chore>> {
        validate_chores(&self.chores)?;
        Ok(self.chores)
    }
}

impl IntoIndexes for OwnerDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_id_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for OwnerDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_ledger::{LedgerError, OwnerId};

    #[test]
    fn test_negative_currency_rejected() {
        let doc = OwnerDoc {
            owner_id: "family".to_string(),
            currency: -5,
            ..Default::default()
        };
        assert!(matches!(doc.balance(), Err(LedgerError::InvalidRecord(_))));
    }

    #[test]
    fn test_invalid_chores_rejected() {
        let owner = OwnerId::new("family");
        let mut chore = Chore::new(&owner, "Dishes", chrono::Utc::now());
        chore.completed = true;

        let doc = OwnerDoc {
            owner_id: owner.to_string(),
            chores: vec![chore],
            ..Default::default()
        };
        assert!(doc.into_chores().is_err());
    }

    #[test]
    fn test_missing_fields_default() {
        let doc: OwnerDoc = bson::from_document(doc! { "owner_id": "family" }).unwrap();
        assert_eq!(doc.balance().unwrap(), 0);
        assert!(doc.decorations.purchased.is_empty());
        assert!(doc.into_chores().unwrap().is_empty());
    }
}
