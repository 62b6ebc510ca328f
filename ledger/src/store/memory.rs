//! In-memory ledger store for tests and local demos.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;

use super::{ensure_positive, LedgerStore};
use crate::error::{LedgerError, Result};
use crate::shop::DecorationInventory;
use crate::types::{Chore, CurrencyTransaction, Member, OwnerId, Quest};

/// Store operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    LoadChores,
    SaveChores,
    GetCurrency,
    CreditCurrency,
    DebitCurrency,
    LoadQuests,
    SaveQuestProgress,
    ClaimQuest,
    InsertQuest,
    LoadDecorations,
    SaveDecorations,
    RecordTransaction,
    LoadTransactions,
    LoadMembers,
    SaveMember,
    RemoveMember,
}

#[derive(Debug, Default, Clone)]
struct OwnerState {
    chores: Vec<Chore>,
    currency: u64,
    quests: Vec<Quest>,
    decorations: DecorationInventory,
    transactions: Vec<CurrencyTransaction>,
}

/// Ledger store held in process memory.
///
/// Each call takes the lock once, so increments and conditional claims are
/// atomic with respect to other calls on the same store.
pub struct InMemoryStore {
    owners: RwLock<HashMap<OwnerId, OwnerState>>,
    members: RwLock<Vec<Member>>,
    failing: Mutex<HashSet<StoreOperation>>,
    credit_calls: AtomicU32,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            owners: RwLock::new(HashMap::new()),
            members: RwLock::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            credit_calls: AtomicU32::new(0),
        }
    }

    /// Seed an owner's balance.
    pub fn with_currency(mut self, owner: &OwnerId, amount: u64) -> Self {
        self.owners.get_mut().entry(owner.clone()).or_default().currency = amount;
        self
    }

    /// Seed an owner's chore list.
    pub fn with_chores(mut self, owner: &OwnerId, chores: Vec<Chore>) -> Self {
        self.owners.get_mut().entry(owner.clone()).or_default().chores = chores;
        self
    }

    /// Seed a quest for an owner.
    pub fn with_quest(mut self, owner: &OwnerId, quest: Quest) -> Self {
        self.owners
            .get_mut()
            .entry(owner.clone())
            .or_default()
            .quests
            .push(quest);
        self
    }

    /// Make an operation fail with `PersistenceFailure` until restored.
    pub fn fail_operation(&self, operation: StoreOperation) {
        self.lock_failing().insert(operation);
    }

    /// Let a previously failing operation succeed again.
    pub fn restore_operation(&self, operation: StoreOperation) {
        self.lock_failing().remove(&operation);
    }

    /// Number of successful `credit_currency` calls.
    pub fn credit_calls(&self) -> u32 {
        self.credit_calls.load(Ordering::SeqCst)
    }

    fn lock_failing(&self) -> std::sync::MutexGuard<'_, HashSet<StoreOperation>> {
        self.failing.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self, operation: StoreOperation) -> Result<()> {
        if self.lock_failing().contains(&operation) {
            return Err(LedgerError::PersistenceFailure(format!(
                "{:?} unavailable",
                operation
            )));
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn load_chores(&self, owner: &OwnerId) -> Result<Vec<Chore>> {
        self.check(StoreOperation::LoadChores)?;
        let owners = self.owners.read().await;
        Ok(owners.get(owner).map(|s| s.chores.clone()).unwrap_or_default())
    }

    async fn save_chores(&self, owner: &OwnerId, chores: &[Chore]) -> Result<()> {
        self.check(StoreOperation::SaveChores)?;
        let mut owners = self.owners.write().await;
        owners.entry(owner.clone()).or_default().chores = chores.to_vec();
        Ok(())
    }

    async fn get_currency(&self, owner: &OwnerId) -> Result<u64> {
        self.check(StoreOperation::GetCurrency)?;
        let owners = self.owners.read().await;
        Ok(owners.get(owner).map(|s| s.currency).unwrap_or(0))
    }

    async fn credit_currency(&self, owner: &OwnerId, amount: u64) -> Result<u64> {
        self.check(StoreOperation::CreditCurrency)?;
        ensure_positive(amount)?;

        let mut owners = self.owners.write().await;
        let state = owners.entry(owner.clone()).or_default();
        state.currency = state.currency.saturating_add(amount);
        self.credit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(state.currency)
    }

    async fn debit_currency(&self, owner: &OwnerId, amount: u64) -> Result<u64> {
        self.check(StoreOperation::DebitCurrency)?;
        ensure_positive(amount)?;

        let mut owners = self.owners.write().await;
        let state = owners.entry(owner.clone()).or_default();
        if state.currency < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: state.currency,
            });
        }
        state.currency -= amount;
        Ok(state.currency)
    }

    async fn load_quests(&self, owner: &OwnerId) -> Result<Vec<Quest>> {
        self.check(StoreOperation::LoadQuests)?;
        let owners = self.owners.read().await;
        Ok(owners.get(owner).map(|s| s.quests.clone()).unwrap_or_default())
    }

    async fn save_quest_progress(
        &self,
        owner: &OwnerId,
        quest_id: &str,
        new_progress: u32,
        is_completed: bool,
    ) -> Result<()> {
        self.check(StoreOperation::SaveQuestProgress)?;
        let mut owners = self.owners.write().await;
        let quest = owners
            .get_mut(owner)
            .and_then(|s| s.quests.iter_mut().find(|q| q.id == quest_id))
            .ok_or_else(|| LedgerError::NotFound(format!("quest '{}'", quest_id)))?;

        quest.current_progress = quest.current_progress.max(new_progress);
        quest.is_completed = quest.is_completed || is_completed;
        Ok(())
    }

    async fn claim_quest(&self, owner: &OwnerId, quest_id: &str) -> Result<Quest> {
        self.check(StoreOperation::ClaimQuest)?;
        let mut owners = self.owners.write().await;
        let quest = owners
            .get_mut(owner)
            .and_then(|s| s.quests.iter_mut().find(|q| q.id == quest_id))
            .ok_or_else(|| LedgerError::NotFound(format!("quest '{}'", quest_id)))?;

        quest.claim(chrono::Utc::now())?;
        Ok(quest.clone())
    }

    async fn insert_quest_if_absent(&self, owner: &OwnerId, quest: Quest) -> Result<bool> {
        self.check(StoreOperation::InsertQuest)?;
        let mut owners = self.owners.write().await;
        let state = owners.entry(owner.clone()).or_default();
        if state.quests.iter().any(|q| q.id == quest.id) {
            return Ok(false);
        }
        state.quests.push(quest);
        Ok(true)
    }

    async fn load_decorations(&self, owner: &OwnerId) -> Result<DecorationInventory> {
        self.check(StoreOperation::LoadDecorations)?;
        let owners = self.owners.read().await;
        Ok(owners
            .get(owner)
            .map(|s| s.decorations.clone())
            .unwrap_or_default())
    }

    async fn save_decorations(
        &self,
        owner: &OwnerId,
        inventory: &DecorationInventory,
    ) -> Result<()> {
        self.check(StoreOperation::SaveDecorations)?;
        let mut owners = self.owners.write().await;
        owners.entry(owner.clone()).or_default().decorations = inventory.clone();
        Ok(())
    }

    async fn record_transaction(&self, transaction: CurrencyTransaction) -> Result<()> {
        self.check(StoreOperation::RecordTransaction)?;
        let mut owners = self.owners.write().await;
        owners
            .entry(transaction.owner_id.clone())
            .or_default()
            .transactions
            .push(transaction);
        Ok(())
    }

    async fn load_transactions(&self, owner: &OwnerId) -> Result<Vec<CurrencyTransaction>> {
        self.check(StoreOperation::LoadTransactions)?;
        let owners = self.owners.read().await;
        Ok(owners
            .get(owner)
            .map(|s| s.transactions.clone())
            .unwrap_or_default())
    }

    async fn load_members(&self, family_id: &OwnerId) -> Result<Vec<Member>> {
        self.check(StoreOperation::LoadMembers)?;
        let members = self.members.read().await;
        Ok(members
            .iter()
            .filter(|m| &m.family_id == family_id)
            .cloned()
            .collect())
    }

    async fn save_member(&self, member: &Member) -> Result<()> {
        self.check(StoreOperation::SaveMember)?;
        let mut members = self.members.write().await;
        match members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member.clone(),
            None => members.push(member.clone()),
        }
        Ok(())
    }

    async fn remove_member(&self, member_id: &OwnerId) -> Result<()> {
        self.check(StoreOperation::RemoveMember)?;
        let mut members = self.members.write().await;
        let before = members.len();
        members.retain(|m| &m.id != member_id);
        if members.len() == before {
            return Err(LedgerError::NotFound(format!("member '{}'", member_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestType;
    use chrono::Utc;

    fn owner() -> OwnerId {
        OwnerId::new("family")
    }

    fn quest(id: &str, target: u32) -> Quest {
        Quest {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            quest_type: QuestType::Daily,
            target_value: target,
            current_progress: 0,
            is_completed: false,
            is_claimed: false,
            reward: 5,
            order: 0,
            expires_at: None,
            created_at: Utc::now(),
            claimed_at: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_owner_defaults() {
        let store = InMemoryStore::new();

        assert_eq!(store.get_currency(&owner()).await.unwrap(), 0);
        assert!(store.load_chores(&owner()).await.unwrap().is_empty());
        assert!(store.load_quests(&owner()).await.unwrap().is_empty());
        assert_eq!(
            store.load_decorations(&owner()).await.unwrap(),
            DecorationInventory::default()
        );
    }

    #[tokio::test]
    async fn test_credit_and_debit() {
        let store = InMemoryStore::new();

        assert_eq!(store.credit_currency(&owner(), 30).await.unwrap(), 30);
        assert_eq!(store.debit_currency(&owner(), 10).await.unwrap(), 20);
        assert_eq!(
            store.debit_currency(&owner(), 21).await,
            Err(LedgerError::InsufficientFunds {
                required: 21,
                available: 20
            })
        );
        assert_eq!(store.get_currency(&owner()).await.unwrap(), 20);
        assert_eq!(store.credit_calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let store = InMemoryStore::new();
        assert!(store.credit_currency(&owner(), 0).await.is_err());
        assert!(store.debit_currency(&owner(), 0).await.is_err());
    }

    #[tokio::test]
    async fn test_progress_never_decreases() {
        let store = InMemoryStore::new().with_quest(&owner(), quest("q", 5));

        store.save_quest_progress(&owner(), "q", 3, false).await.unwrap();
        store.save_quest_progress(&owner(), "q", 1, false).await.unwrap();

        let quests = store.load_quests(&owner()).await.unwrap();
        assert_eq!(quests[0].current_progress, 3);
    }

    #[tokio::test]
    async fn test_claim_quest_conditions() {
        let store = InMemoryStore::new().with_quest(&owner(), quest("q", 1));

        assert!(matches!(
            store.claim_quest(&owner(), "missing").await,
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            store.claim_quest(&owner(), "q").await,
            Err(LedgerError::NotReady(_))
        ));

        store.save_quest_progress(&owner(), "q", 1, true).await.unwrap();
        let claimed = store.claim_quest(&owner(), "q").await.unwrap();
        assert!(claimed.is_claimed);

        assert!(matches!(
            store.claim_quest(&owner(), "q").await,
            Err(LedgerError::AlreadyClaimed(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_quest_if_absent() {
        let store = InMemoryStore::new();

        assert!(store.insert_quest_if_absent(&owner(), quest("q", 1)).await.unwrap());
        assert!(!store.insert_quest_if_absent(&owner(), quest("q", 9)).await.unwrap());

        let quests = store.load_quests(&owner()).await.unwrap();
        assert_eq!(quests.len(), 1);
        assert_eq!(quests[0].target_value, 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemoryStore::new();
        store.fail_operation(StoreOperation::SaveChores);

        let err = store.save_chores(&owner(), &[]).await.unwrap_err();
        assert!(err.is_persistence());

        store.restore_operation(StoreOperation::SaveChores);
        assert!(store.save_chores(&owner(), &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_members_by_family() {
        let store = InMemoryStore::new();
        let member = |id: &str, family: &str| Member {
            id: OwnerId::new(id),
            family_id: OwnerId::new(family),
            name: id.to_string(),
            created_at: Utc::now(),
        };

        store.save_member(&member("m1", "f1")).await.unwrap();
        store.save_member(&member("m2", "f1")).await.unwrap();
        store.save_member(&member("m3", "f2")).await.unwrap();

        assert_eq!(store.load_members(&OwnerId::new("f1")).await.unwrap().len(), 2);

        store.remove_member(&OwnerId::new("m1")).await.unwrap();
        assert!(matches!(
            store.remove_member(&OwnerId::new("m1")).await,
            Err(LedgerError::NotFound(_))
        ));
    }
}
