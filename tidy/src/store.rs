//! MongoDB-backed ledger store.
//!
//! Balances only move through `$inc`, quest progress through `$max`, and
//! claims through a single conditional update, so concurrent writers cannot
//! lose increments or double-claim.

use async_trait::async_trait;
use bson::{doc, Bson, DateTime, Document};
use serde::Serialize;
use tidy_ledger::{
    check_claimable, store::ensure_positive, Chore, CurrencyTransaction, DecorationInventory,
    LedgerError, LedgerStore, Member, OwnerId, Quest, Result,
};
use tracing::{debug, warn};

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{
    to_stored, MemberDoc, OwnerDoc, QuestDoc, TransactionDoc, MEMBER_COLLECTION,
    OWNER_COLLECTION, QUEST_COLLECTION, TRANSACTION_COLLECTION,
};

fn encode<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<Bson> {
    bson::to_bson(value)
        .map_err(|e| LedgerError::InvalidRecord(format!("Failed to encode {}: {}", what, e)))
}

fn owner_filter(owner: &OwnerId) -> Document {
    doc! { "owner_id": owner.as_str() }
}

fn quest_filter(owner: &OwnerId, quest_id: &str) -> Document {
    doc! { "owner_id": owner.as_str(), "quest_id": quest_id }
}

/// Metadata written when an upsert creates the document.
fn on_insert() -> Document {
    doc! {
        "metadata.is_deleted": false,
        "metadata.created_at": DateTime::now(),
    }
}

/// Ledger store over the `owners`, `quests`, `transactions` and `members`
/// collections.
pub struct MongoLedgerStore {
    owners: MongoCollection<OwnerDoc>,
    quests: MongoCollection<QuestDoc>,
    transactions: MongoCollection<TransactionDoc>,
    members: MongoCollection<MemberDoc>,
}

impl MongoLedgerStore {
    /// Open the collections and apply their indexes.
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            owners: client.collection(OWNER_COLLECTION).await?,
            quests: client.collection(QUEST_COLLECTION).await?,
            transactions: client.collection(TRANSACTION_COLLECTION).await?,
            members: client.collection(MEMBER_COLLECTION).await?,
        })
    }

    async fn owner_doc(&self, owner: &OwnerId) -> Result<Option<OwnerDoc>> {
        self.owners.find_one(owner_filter(owner)).await
    }

    /// Set fields on the owner document, creating it if needed.
    async fn set_owner_fields(&self, owner: &OwnerId, mut fields: Document) -> Result<()> {
        fields.insert("metadata.updated_at", DateTime::now());
        self.owners
            .upsert_one(
                owner_filter(owner),
                doc! { "$set": fields, "$setOnInsert": on_insert() },
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MongoLedgerStore {
    fn id(&self) -> &str {
        "mongodb"
    }

    async fn load_chores(&self, owner: &OwnerId) -> Result<Vec<Chore>> {
        match self.owner_doc(owner).await? {
            Some(doc) => doc.into_chores(),
            None => Ok(Vec::new()),
        }
    }

    async fn save_chores(&self, owner: &OwnerId, chores: &[Chore]) -> Result<()> {
        let chores = encode(chores, "chores")?;
        self.set_owner_fields(owner, doc! { "chores": chores }).await?;
        debug!(owner = %owner, "Saved chore list");
        Ok(())
    }

    async fn get_currency(&self, owner: &OwnerId) -> Result<u64> {
        match self.owner_doc(owner).await? {
            Some(doc) => doc.balance(),
            None => Ok(0),
        }
    }

    async fn credit_currency(&self, owner: &OwnerId, amount: u64) -> Result<u64> {
        ensure_positive(amount)?;
        let amount = to_stored(amount, "amount")?;

        let doc = self
            .owners
            .find_one_and_update(
                owner_filter(owner),
                doc! {
                    "$inc": { "currency": amount },
                    "$set": { "metadata.updated_at": DateTime::now() },
                    "$setOnInsert": on_insert(),
                },
                true,
            )
            .await?
            .ok_or_else(|| {
                LedgerError::PersistenceFailure(format!("credit for '{}' returned no document", owner))
            })?;

        doc.balance()
    }

    async fn debit_currency(&self, owner: &OwnerId, amount: u64) -> Result<u64> {
        ensure_positive(amount)?;
        let stored = to_stored(amount, "amount")?;

        let mut filter = owner_filter(owner);
        filter.insert("currency", doc! { "$gte": stored });

        let updated = self
            .owners
            .find_one_and_update(
                filter,
                doc! {
                    "$inc": { "currency": -stored },
                    "$set": { "metadata.updated_at": DateTime::now() },
                },
                false,
            )
            .await?;

        match updated {
            Some(doc) => doc.balance(),
            None => Err(LedgerError::InsufficientFunds {
                required: amount,
                available: self.get_currency(owner).await?,
            }),
        }
    }

    async fn load_quests(&self, owner: &OwnerId) -> Result<Vec<Quest>> {
        self.quests
            .find_many(owner_filter(owner), doc! { "order": 1 })
            .await?
            .into_iter()
            .map(Quest::try_from)
            .collect()
    }

    async fn save_quest_progress(
        &self,
        owner: &OwnerId,
        quest_id: &str,
        new_progress: u32,
        is_completed: bool,
    ) -> Result<()> {
        let mut set = doc! { "metadata.updated_at": DateTime::now() };
        // Completion is never written back to false.
        if is_completed {
            set.insert("is_completed", true);
        }

        let result = self
            .quests
            .update_one(
                quest_filter(owner, quest_id),
                doc! {
                    "$max": { "current_progress": i64::from(new_progress) },
                    "$set": set,
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(LedgerError::NotFound(format!("quest '{}'", quest_id)));
        }
        Ok(())
    }

    async fn claim_quest(&self, owner: &OwnerId, quest_id: &str) -> Result<Quest> {
        let mut filter = quest_filter(owner, quest_id);
        filter.insert("is_completed", true);
        filter.insert("is_claimed", false);

        let now = DateTime::now();
        let claimed = self
            .quests
            .find_one_and_update(
                filter,
                doc! {
                    "$set": {
                        "is_claimed": true,
                        "claimed_at": now,
                        "metadata.updated_at": now,
                    }
                },
                false,
            )
            .await?;

        if let Some(doc) = claimed {
            return Quest::try_from(doc);
        }

        // Nothing matched; work out which condition failed.
        let current = self
            .quests
            .find_one(quest_filter(owner, quest_id))
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("quest '{}'", quest_id)))?;
        check_claimable(&Quest::try_from(current)?)?;

        warn!(owner = %owner, quest_id = %quest_id, "Quest became claimable during claim");
        Err(LedgerError::PersistenceFailure(format!(
            "claim of quest '{}' conflicted with a concurrent update",
            quest_id
        )))
    }

    async fn insert_quest_if_absent(&self, owner: &OwnerId, quest: Quest) -> Result<bool> {
        let doc = QuestDoc::from_quest(owner, &quest)?;
        let mut fields = bson::to_document(&doc)
            .map_err(|e| LedgerError::InvalidRecord(format!("Failed to encode quest: {}", e)))?;
        // Filter fields are copied into the new document by the upsert
        fields.remove("owner_id");
        fields.remove("quest_id");

        let result = self
            .quests
            .upsert_one(quest_filter(owner, &quest.id), doc! { "$setOnInsert": fields })
            .await?;

        Ok(result.upserted_id.is_some())
    }

    async fn load_decorations(&self, owner: &OwnerId) -> Result<DecorationInventory> {
        Ok(self
            .owner_doc(owner)
            .await?
            .map(|doc| doc.decorations)
            .unwrap_or_default())
    }

    async fn save_decorations(
        &self,
        owner: &OwnerId,
        inventory: &DecorationInventory,
    ) -> Result<()> {
        let inventory = encode(inventory, "decorations")?;
        self.set_owner_fields(owner, doc! { "decorations": inventory })
            .await
    }

    async fn record_transaction(&self, transaction: CurrencyTransaction) -> Result<()> {
        let doc = TransactionDoc::try_from(&transaction)?;
        self.transactions.insert_one(doc).await
    }

    async fn load_transactions(&self, owner: &OwnerId) -> Result<Vec<CurrencyTransaction>> {
        self.transactions
            .find_many(owner_filter(owner), doc! { "timestamp": 1 })
            .await?
            .into_iter()
            .map(CurrencyTransaction::try_from)
            .collect()
    }

    async fn load_members(&self, family_id: &OwnerId) -> Result<Vec<Member>> {
        self.members
            .find_many(
                doc! { "family_id": family_id.as_str() },
                doc! { "metadata.created_at": 1 },
            )
            .await?
            .into_iter()
            .map(Member::try_from)
            .collect()
    }

    async fn save_member(&self, member: &Member) -> Result<()> {
        self.members
            .upsert_one(
                doc! { "member_id": member.id.as_str() },
                doc! {
                    "$set": {
                        "family_id": member.family_id.as_str(),
                        "name": member.name.as_str(),
                        "metadata.updated_at": DateTime::now(),
                    },
                    "$setOnInsert": {
                        "metadata.is_deleted": false,
                        "metadata.created_at": DateTime::from_chrono(member.created_at),
                    },
                },
            )
            .await?;
        Ok(())
    }

    async fn remove_member(&self, member_id: &OwnerId) -> Result<()> {
        if !self
            .members
            .soft_delete(doc! { "member_id": member_id.as_str() })
            .await?
        {
            return Err(LedgerError::NotFound(format!("member '{}'", member_id)));
        }
        Ok(())
    }
}
