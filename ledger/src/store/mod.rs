//! Persistence abstraction for the ledger.
//!
//! The ledger only talks to a [`LedgerStore`]. Production uses the MongoDB
//! implementation in the `tidy` crate; tests and demos use [`InMemoryStore`].

pub mod memory;

use async_trait::async_trait;

use crate::error::{LedgerError, Result};
use crate::shop::DecorationInventory;
use crate::types::{Chore, CurrencyTransaction, Member, OwnerId, Quest};

pub use memory::{InMemoryStore, StoreOperation};

/// Backing store for chores, balances, quests and the shop inventory.
///
/// Currency changes must be atomic increments in the store itself; the ledger
/// never reads a balance and writes it back.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Backend identifier for logs.
    fn id(&self) -> &str;

    /// Chore list for an owner, in stored order. Unknown owners have none.
    async fn load_chores(&self, owner: &OwnerId) -> Result<Vec<Chore>>;

    /// Replace an owner's chore list.
    async fn save_chores(&self, owner: &OwnerId, chores: &[Chore]) -> Result<()>;

    /// Current balance; zero for an owner never seen before.
    async fn get_currency(&self, owner: &OwnerId) -> Result<u64>;

    /// Atomically add `amount` (> 0) and return the new balance.
    async fn credit_currency(&self, owner: &OwnerId, amount: u64) -> Result<u64>;

    /// Atomically subtract `amount` (> 0) and return the new balance.
    ///
    /// Fails with `InsufficientFunds` and leaves the balance alone when it is
    /// below `amount`.
    async fn debit_currency(&self, owner: &OwnerId, amount: u64) -> Result<u64>;

    /// All quests for an owner, in no particular order.
    async fn load_quests(&self, owner: &OwnerId) -> Result<Vec<Quest>>;

    /// Write new progress for a quest. Stores never lower stored progress.
    async fn save_quest_progress(
        &self,
        owner: &OwnerId,
        quest_id: &str,
        new_progress: u32,
        is_completed: bool,
    ) -> Result<()>;

    /// Mark a completed quest claimed and return it.
    ///
    /// Fails with `NotFound`, `NotReady` or `AlreadyClaimed`; the check and the
    /// write happen as one conditional update.
    async fn claim_quest(&self, owner: &OwnerId, quest_id: &str) -> Result<Quest>;

    /// Insert a quest unless one with the same id exists. Returns true if inserted.
    async fn insert_quest_if_absent(&self, owner: &OwnerId, quest: Quest) -> Result<bool>;

    async fn load_decorations(&self, owner: &OwnerId) -> Result<DecorationInventory>;

    async fn save_decorations(&self, owner: &OwnerId, inventory: &DecorationInventory)
        -> Result<()>;

    /// Append to the owner's currency history.
    async fn record_transaction(&self, transaction: CurrencyTransaction) -> Result<()>;

    /// Currency history, oldest first.
    async fn load_transactions(&self, owner: &OwnerId) -> Result<Vec<CurrencyTransaction>>;

    /// Members of a family, in creation order.
    async fn load_members(&self, family_id: &OwnerId) -> Result<Vec<Member>>;

    /// Insert or replace a member.
    async fn save_member(&self, member: &Member) -> Result<()>;

    /// Delete a member; `NotFound` if absent.
    async fn remove_member(&self, member_id: &OwnerId) -> Result<()>;
}

/// Reject zero-valued currency movements.
pub fn ensure_positive(amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(LedgerError::InvalidRecord(
            "currency amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
