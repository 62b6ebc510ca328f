//! Currency transaction document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use tidy_ledger::{CurrencyTransaction, LedgerError, OwnerId, Result, TransactionReason};

use super::{from_stored, required, to_stored};
use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for the currency history
pub const TRANSACTION_COLLECTION: &str = "transactions";

/// Transaction document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TransactionDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    pub tx_id: String,
    pub owner_id: String,
    /// credit or debit
    pub kind: String,
    pub amount: i64,
    pub reason: Option<TransactionReason>,
    pub balance_after: i64,
    pub timestamp: Option<DateTime>,
}

impl TryFrom<&CurrencyTransaction> for TransactionDoc {
    type Error = LedgerError;

    fn try_from(tx: &CurrencyTransaction) -> Result<Self> {
        Ok(Self {
            _id: None,
            metadata: Metadata::new(),
            tx_id: tx.id.clone(),
            owner_id: tx.owner_id.to_string(),
            kind: tx.kind.as_str().to_string(),
            amount: to_stored(tx.amount, "amount")?,
            reason: Some(tx.reason.clone()),
            balance_after: to_stored(tx.balance_after, "balance_after")?,
            timestamp: Some(DateTime::from_chrono(tx.timestamp)),
        })
    }
}

impl TryFrom<TransactionDoc> for CurrencyTransaction {
    type Error = LedgerError;

    fn try_from(doc: TransactionDoc) -> Result<Self> {
        Ok(Self {
            id: doc.tx_id,
            owner_id: OwnerId::new(doc.owner_id),
            kind: doc.kind.parse().map_err(LedgerError::InvalidRecord)?,
            amount: from_stored(doc.amount, "amount")?,
            reason: required(doc.reason, "transaction reason")?,
            balance_after: from_stored(doc.balance_after, "balance_after")?,
            timestamp: required(doc.timestamp, "transaction timestamp")?.to_chrono(),
        })
    }
}

impl IntoIndexes for TransactionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "tx_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("tx_id_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "owner_id": 1, "timestamp": 1 },
                Some(
                    IndexOptions::builder()
                        .name("owner_timestamp_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for TransactionDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_ledger::TransactionKind;

    #[test]
    fn test_transaction_conversion() {
        let tx = CurrencyTransaction::new(
            OwnerId::new("family"),
            TransactionKind::Debit,
            75,
            TransactionReason::DecorationPurchased {
                decoration_id: "christmas_lights".to_string(),
            },
            25,
        );

        let doc = TransactionDoc::try_from(&tx).unwrap();
        assert_eq!(doc.kind, "debit");

        let back = CurrencyTransaction::try_from(doc).unwrap();
        assert_eq!(back.kind, TransactionKind::Debit);
        assert_eq!(back.amount, 75);
        assert_eq!(back.reason, tx.reason);
    }

    #[test]
    fn test_missing_reason_rejected() {
        let doc = TransactionDoc {
            tx_id: "t1".to_string(),
            owner_id: "family".to_string(),
            kind: "credit".to_string(),
            amount: 10,
            balance_after: 10,
            timestamp: Some(DateTime::now()),
            ..Default::default()
        };
        assert!(matches!(
            CurrencyTransaction::try_from(doc),
            Err(LedgerError::InvalidRecord(_))
        ));
    }
}
