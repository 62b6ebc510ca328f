//! ChoreLedger - main entry point for chore, reward and shop operations.
//!
//! Every operation goes through the injected [`LedgerStore`]. Chore lists are
//! persisted before any reward is issued, so a failed save leaves balances and
//! quests untouched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::chore::{normalize_title, toggle_completion, validate_chores};
use crate::config::LedgerConfig;
use crate::detection::first_time_completions;
use crate::error::{LedgerError, Result};
use crate::quest::sort_quests;
use crate::shop::{find_decoration, shop_items, DecorationInventory, ShopItem};
use crate::store::LedgerStore;
use crate::types::{
    Chore, CurrencyTransaction, Member, OwnerId, Priority, Quest, TransactionKind,
    TransactionReason,
};

/// Quest progress after a reward pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest_id: String,
    pub current_progress: u32,
    pub target_value: u32,
    pub is_completed: bool,
}

impl From<&Quest> for QuestProgress {
    fn from(quest: &Quest) -> Self {
        Self {
            quest_id: quest.id.clone(),
            current_progress: quest.current_progress,
            target_value: quest.target_value,
            is_completed: quest.is_completed,
        }
    }
}

/// What a chore update paid out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSummary {
    /// Chores completed for the first time, in list order
    pub rewarded_chores: Vec<String>,
    pub coins_credited: u64,
    /// Balance after the update
    pub balance: u64,
    /// Final progress of every quest that was advanced
    pub quest_updates: Vec<QuestProgress>,
    /// Quests that reached their target during this update
    pub newly_completed_quests: Vec<String>,
}

/// Result of checking or unchecking one chore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub chore: Chore,
    pub rewards: RewardSummary,
}

/// Result of a successful quest claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub quest_id: String,
    pub reward: u64,
    pub balance: u64,
}

/// Chore reward ledger over a persistence backend.
pub struct ChoreLedger {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl ChoreLedger {
    /// Create a ledger with the default reward policy.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            config: LedgerConfig::default(),
        }
    }

    /// Create with configuration.
    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    // ------------------------------------------------------------------
    // Chores
    // ------------------------------------------------------------------

    /// Chore list for an owner.
    pub async fn chores(&self, owner: &OwnerId) -> Result<Vec<Chore>> {
        self.store.load_chores(owner).await
    }

    /// Append a new chore to an owner's list.
    pub async fn add_chore(
        &self,
        owner: &OwnerId,
        title: &str,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<Chore> {
        let title = normalize_title(title)?;
        let mut chore = Chore::new(owner, title, now).with_priority(priority.unwrap_or_default());
        if let Some(due) = due_date {
            chore = chore.with_due_date(due);
        }

        let mut chores = self.store.load_chores(owner).await?;
        chores.push(chore.clone());
        self.store.save_chores(owner, &chores).await?;

        info!(owner = %owner, chore_id = %chore.id, "Added chore");
        Ok(chore)
    }

    /// Remove a chore from an owner's list.
    pub async fn remove_chore(&self, owner: &OwnerId, chore_id: &str) -> Result<Chore> {
        let mut chores = self.store.load_chores(owner).await?;
        let index = find_chore(&chores, chore_id)?;
        let removed = chores.remove(index);
        self.store.save_chores(owner, &chores).await?;

        info!(owner = %owner, chore_id = %chore_id, "Removed chore");
        Ok(removed)
    }

    /// Check or uncheck a chore, paying out if this is its first completion.
    pub async fn toggle_chore(
        &self,
        owner: &OwnerId,
        chore_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ToggleOutcome> {
        let before = self.store.load_chores(owner).await?;
        let index = find_chore(&before, chore_id)?;

        let mut after = before.clone();
        after[index] = toggle_completion(&before[index], now);

        debug!(
            owner = %owner,
            chore_id = %chore_id,
            completed = after[index].completed,
            "Toggled chore"
        );

        let rewards = self.commit_chores(owner, &before, &after).await?;
        Ok(ToggleOutcome {
            chore: after.swap_remove(index),
            rewards,
        })
    }

    /// Replace an owner's chore list with an edited one and pay out first
    /// completions found in it.
    pub async fn apply_chore_update(
        &self,
        owner: &OwnerId,
        after: Vec<Chore>,
    ) -> Result<RewardSummary> {
        validate_chores(&after)?;
        let before = self.store.load_chores(owner).await?;
        ensure_completed_before_kept(&before, &after)?;

        self.commit_chores(owner, &before, &after).await
    }

    async fn commit_chores(
        &self,
        owner: &OwnerId,
        before: &[Chore],
        after: &[Chore],
    ) -> Result<RewardSummary> {
        let detected = first_time_completions(before, after);

        self.store.save_chores(owner, after).await?;

        let mut settled = HashSet::new();
        match self.pay_out(owner, &detected, &mut settled).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                // Unpaid chores go back to their prior state so a retry detects them again.
                let restored = restore_unsettled(before, after, &detected, &settled);
                warn!(
                    owner = %owner,
                    unpaid = detected.len() - settled.len(),
                    error = %e,
                    "Reward failed, restoring unpaid chores"
                );
                if let Err(restore_err) = self.store.save_chores(owner, &restored).await {
                    warn!(owner = %owner, error = %restore_err, "Failed to restore chore list");
                }
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Rewards
    // ------------------------------------------------------------------

    /// Pay out for chores completed for the first time.
    ///
    /// Each chore is processed on its own: one currency credit of the
    /// configured amount and one step on every unclaimed daily or weekly quest.
    pub async fn issue_rewards(
        &self,
        owner: &OwnerId,
        chores: &[&Chore],
    ) -> Result<RewardSummary> {
        self.pay_out(owner, chores, &mut HashSet::new()).await
    }

    /// Reward loop behind [`Self::issue_rewards`].
    ///
    /// A chore id lands in `settled` once its credit went through, or once its
    /// quest steps did when chore pay is disabled.
    async fn pay_out<'a>(
        &self,
        owner: &OwnerId,
        chores: &[&'a Chore],
        settled: &mut HashSet<&'a str>,
    ) -> Result<RewardSummary> {
        let mut summary = RewardSummary::default();

        if chores.is_empty() {
            summary.balance = self.store.get_currency(owner).await?;
            return Ok(summary);
        }

        let mut quests: Vec<Quest> = self
            .store
            .load_quests(owner)
            .await?
            .into_iter()
            .filter(|q| q.is_active() && q.quest_type.advances_on_chore())
            .collect();
        sort_quests(&mut quests);

        let mut balance = None;

        for &chore in chores {
            if self.config.chore_reward > 0 {
                let amount = self.config.chore_reward;
                let new_balance = self.store.credit_currency(owner, amount).await?;
                summary.coins_credited += amount;
                balance = Some(new_balance);
                settled.insert(chore.id.as_str());

                self.record_transaction(
                    owner,
                    TransactionKind::Credit,
                    amount,
                    TransactionReason::ChoreCompleted {
                        chore_id: chore.id.clone(),
                    },
                    new_balance,
                )
                .await;
            }

            for quest in quests.iter_mut() {
                let reached = quest.advance(1);
                self.store
                    .save_quest_progress(owner, &quest.id, quest.current_progress, quest.is_completed)
                    .await?;

                if reached {
                    info!(owner = %owner, quest_id = %quest.id, "Quest completed");
                    summary.newly_completed_quests.push(quest.id.clone());
                }
            }

            settled.insert(chore.id.as_str());
            summary.rewarded_chores.push(chore.id.clone());
        }

        summary.quest_updates = quests.iter().map(QuestProgress::from).collect();
        summary.balance = match balance {
            Some(b) => b,
            None => self.store.get_currency(owner).await?,
        };

        info!(
            owner = %owner,
            chores = summary.rewarded_chores.len(),
            coins = summary.coins_credited,
            balance = summary.balance,
            "Issued chore rewards"
        );
        Ok(summary)
    }

    // ------------------------------------------------------------------
    // Currency
    // ------------------------------------------------------------------

    /// Current coin balance.
    pub async fn balance(&self, owner: &OwnerId) -> Result<u64> {
        self.store.get_currency(owner).await
    }

    /// Currency history, oldest first.
    pub async fn transactions(&self, owner: &OwnerId) -> Result<Vec<CurrencyTransaction>> {
        self.store.load_transactions(owner).await
    }

    async fn record_transaction(
        &self,
        owner: &OwnerId,
        kind: TransactionKind,
        amount: u64,
        reason: TransactionReason,
        balance_after: u64,
    ) {
        if !self.config.record_transactions {
            return;
        }

        let transaction =
            CurrencyTransaction::new(owner.clone(), kind, amount, reason, balance_after);

        // The balance has already moved; a history write failure must not make
        // callers retry the movement itself.
        if let Err(e) = self.store.record_transaction(transaction).await {
            warn!(owner = %owner, error = %e, "Failed to record currency transaction");
        }
    }

    // ------------------------------------------------------------------
    // Quests
    // ------------------------------------------------------------------

    /// All quests, daily first then weekly, monthly, special.
    pub async fn quests(&self, owner: &OwnerId) -> Result<Vec<Quest>> {
        let mut quests = self.store.load_quests(owner).await?;
        sort_quests(&mut quests);
        Ok(quests)
    }

    /// Quests whose reward has not been claimed.
    pub async fn active_quests(&self, owner: &OwnerId) -> Result<Vec<Quest>> {
        let mut quests = self.quests(owner).await?;
        quests.retain(Quest::is_active);
        Ok(quests)
    }

    /// Completed quests waiting to be claimed.
    pub async fn claimable_quests(&self, owner: &OwnerId) -> Result<Vec<Quest>> {
        let mut quests = self.quests(owner).await?;
        quests.retain(Quest::is_claimable);
        Ok(quests)
    }

    /// Seed the configured quests an owner does not have yet.
    ///
    /// Returns the ids of the quests created.
    pub async fn initialize_quests(
        &self,
        owner: &OwnerId,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let mut created = Vec::new();

        for template in &self.config.quest_templates {
            let quest = template.instantiate(now);
            quest.validate()?;

            if self.store.insert_quest_if_absent(owner, quest).await? {
                created.push(template.id.clone());
            }
        }

        info!(owner = %owner, created = created.len(), "Initialized quests");
        Ok(created)
    }

    /// Claim a completed quest's reward.
    pub async fn claim_quest(&self, owner: &OwnerId, quest_id: &str) -> Result<ClaimReceipt> {
        let quest = self.store.claim_quest(owner, quest_id).await?;

        let balance = if quest.reward > 0 {
            let balance = self.store.credit_currency(owner, quest.reward).await?;
            self.record_transaction(
                owner,
                TransactionKind::Credit,
                quest.reward,
                TransactionReason::QuestClaimed {
                    quest_id: quest.id.clone(),
                },
                balance,
            )
            .await;
            balance
        } else {
            self.store.get_currency(owner).await?
        };

        info!(owner = %owner, quest_id = %quest_id, reward = quest.reward, "Claimed quest reward");
        Ok(ClaimReceipt {
            quest_id: quest.id,
            reward: quest.reward,
            balance,
        })
    }

    // ------------------------------------------------------------------
    // Shop
    // ------------------------------------------------------------------

    /// Catalog annotated with what the owner has bought and shows.
    pub async fn shop(&self, owner: &OwnerId) -> Result<Vec<ShopItem>> {
        let inventory = self.store.load_decorations(owner).await?;
        Ok(shop_items(&inventory))
    }

    /// Owner's decoration inventory.
    pub async fn decorations(&self, owner: &OwnerId) -> Result<DecorationInventory> {
        self.store.load_decorations(owner).await
    }

    /// Buy a decoration. Returns the balance after the purchase.
    pub async fn purchase_decoration(&self, owner: &OwnerId, decoration_id: &str) -> Result<u64> {
        let decoration = find_decoration(decoration_id)?;
        let mut inventory = self.store.load_decorations(owner).await?;
        if inventory.owns(decoration_id) {
            return Err(LedgerError::AlreadyOwned(decoration_id.to_string()));
        }

        let balance = self.store.debit_currency(owner, decoration.price).await?;
        inventory.add(decoration_id)?;

        if let Err(e) = self.store.save_decorations(owner, &inventory).await {
            warn!(
                owner = %owner,
                decoration_id = %decoration_id,
                error = %e,
                "Saving decoration failed, refunding purchase"
            );
            self.store.credit_currency(owner, decoration.price).await?;
            return Err(e);
        }

        self.record_transaction(
            owner,
            TransactionKind::Debit,
            decoration.price,
            TransactionReason::DecorationPurchased {
                decoration_id: decoration_id.to_string(),
            },
            balance,
        )
        .await;

        info!(owner = %owner, decoration_id = %decoration_id, balance, "Purchased decoration");
        Ok(balance)
    }

    /// Show an owned decoration, or clear the selection with `None`.
    pub async fn set_active_decoration(
        &self,
        owner: &OwnerId,
        decoration_id: Option<&str>,
    ) -> Result<DecorationInventory> {
        let mut inventory = self.store.load_decorations(owner).await?;
        inventory.set_active(decoration_id)?;
        self.store.save_decorations(owner, &inventory).await?;
        Ok(inventory)
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    /// Members of a family, in creation order.
    pub async fn members(&self, family_id: &OwnerId) -> Result<Vec<Member>> {
        self.store.load_members(family_id).await
    }

    /// Add a named member to a family.
    pub async fn add_member(
        &self,
        family_id: &OwnerId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Member> {
        let name = normalize_member_name(name)?;
        let member = Member {
            id: OwnerId::new(format!("{}_{}", family_id, uuid::Uuid::new_v4().simple())),
            family_id: family_id.clone(),
            name,
            created_at: now,
        };

        self.store.save_member(&member).await?;
        info!(family = %family_id, member = %member.id, "Added member");
        Ok(member)
    }

    /// Change a member's display name.
    pub async fn rename_member(
        &self,
        family_id: &OwnerId,
        member_id: &OwnerId,
        name: &str,
    ) -> Result<Member> {
        let name = normalize_member_name(name)?;
        let mut member = self.find_member(family_id, member_id).await?;
        member.name = name;
        self.store.save_member(&member).await?;
        Ok(member)
    }

    /// Remove a member from a family.
    pub async fn remove_member(&self, family_id: &OwnerId, member_id: &OwnerId) -> Result<()> {
        self.find_member(family_id, member_id).await?;
        self.store.remove_member(member_id).await?;
        info!(family = %family_id, member = %member_id, "Removed member");
        Ok(())
    }

    async fn find_member(&self, family_id: &OwnerId, member_id: &OwnerId) -> Result<Member> {
        self.store
            .load_members(family_id)
            .await?
            .into_iter()
            .find(|m| &m.id == member_id)
            .ok_or_else(|| LedgerError::NotFound(format!("member '{}'", member_id)))
    }
}

fn find_chore(chores: &[Chore], chore_id: &str) -> Result<usize> {
    chores
        .iter()
        .position(|c| c.id == chore_id)
        .ok_or_else(|| LedgerError::NotFound(format!("chore '{}'", chore_id)))
}

fn normalize_member_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidRecord(
            "member name is empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// `after` with every detected but unpaid chore put back as it was in
/// `before`. A chore that was not in `before` goes back to never completed.
fn restore_unsettled(
    before: &[Chore],
    after: &[Chore],
    detected: &[&Chore],
    settled: &HashSet<&str>,
) -> Vec<Chore> {
    let unpaid: HashSet<&str> = detected
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| !settled.contains(id))
        .collect();

    after
        .iter()
        .map(|chore| {
            if !unpaid.contains(chore.id.as_str()) {
                return chore.clone();
            }
            before
                .iter()
                .find(|c| c.id == chore.id)
                .cloned()
                .unwrap_or_else(|| Chore {
                    completed: false,
                    completed_at: None,
                    completed_before: false,
                    ..chore.clone()
                })
        })
        .collect()
}

/// An edited list may not clear `completed_before` on a chore that had it.
fn ensure_completed_before_kept(before: &[Chore], after: &[Chore]) -> Result<()> {
    let flagged: HashMap<&str, bool> = before
        .iter()
        .map(|c| (c.id.as_str(), c.completed_before))
        .collect();

    for chore in after {
        if flagged.get(chore.id.as_str()).copied().unwrap_or(false) && !chore.completed_before {
            return Err(LedgerError::InvalidRecord(format!(
                "chore '{}' cannot lose its completedBefore flag",
                chore.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, StoreOperation};
    use crate::types::QuestType;

    fn owner() -> OwnerId {
        OwnerId::new("family")
    }

    fn daily(id: &str, target: u32, reward: u64) -> Quest {
        Quest {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            quest_type: QuestType::Daily,
            target_value: target,
            current_progress: 0,
            is_completed: false,
            is_claimed: false,
            reward,
            order: 0,
            expires_at: None,
            created_at: Utc::now(),
            claimed_at: None,
        }
    }

    fn ledger_with(store: InMemoryStore) -> (ChoreLedger, Arc<InMemoryStore>) {
        let store = Arc::new(store);
        (ChoreLedger::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_add_and_remove_chore() {
        let (ledger, _) = ledger_with(InMemoryStore::new());
        let now = Utc::now();

        let first = ledger.add_chore(&owner(), "Dishes", None, None, now).await.unwrap();
        let second = ledger
            .add_chore(&owner(), " Trash ", Some(Priority::High), None, now)
            .await
            .unwrap();
        assert_eq!(second.title, "Trash");

        let chores = ledger.chores(&owner()).await.unwrap();
        assert_eq!(chores.iter().map(|c| c.id.clone()).collect::<Vec<_>>(), vec![first.id.clone(), second.id.clone()]);

        ledger.remove_chore(&owner(), &first.id).await.unwrap();
        assert_eq!(ledger.chores(&owner()).await.unwrap().len(), 1);
        assert!(matches!(
            ledger.remove_chore(&owner(), &first.id).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_blank_chore_rejected() {
        let (ledger, _) = ledger_with(InMemoryStore::new());
        let result = ledger.add_chore(&owner(), "   ", None, None, Utc::now()).await;
        assert!(matches!(result, Err(LedgerError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn test_toggle_pays_default_reward_once() {
        let (ledger, _) = ledger_with(InMemoryStore::new());
        let chore = ledger.add_chore(&owner(), "Dishes", None, None, Utc::now()).await.unwrap();

        let on = ledger.toggle_chore(&owner(), &chore.id, Utc::now()).await.unwrap();
        assert!(on.chore.completed);
        assert_eq!(on.rewards.coins_credited, 10);
        assert_eq!(on.rewards.balance, 10);

        let off = ledger.toggle_chore(&owner(), &chore.id, Utc::now()).await.unwrap();
        assert!(!off.chore.completed);
        assert!(off.rewards.rewarded_chores.is_empty());

        let again = ledger.toggle_chore(&owner(), &chore.id, Utc::now()).await.unwrap();
        assert!(again.chore.completed);
        assert_eq!(again.rewards.coins_credited, 0);
        assert_eq!(again.rewards.balance, 10);
    }

    #[tokio::test]
    async fn test_toggle_unknown_chore() {
        let (ledger, _) = ledger_with(InMemoryStore::new());
        assert!(matches!(
            ledger.toggle_chore(&owner(), "nope", Utc::now()).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_chore_reward_skips_credit() {
        let (ledger, store) = ledger_with(InMemoryStore::new().with_quest(&owner(), daily("d", 1, 1)));
        let ledger = ledger.with_config(LedgerConfig::default().with_chore_reward(0));
        let chore = ledger.add_chore(&owner(), "Dishes", None, None, Utc::now()).await.unwrap();

        let outcome = ledger.toggle_chore(&owner(), &chore.id, Utc::now()).await.unwrap();
        assert_eq!(outcome.rewards.coins_credited, 0);
        assert_eq!(outcome.rewards.newly_completed_quests, vec!["d".to_string()]);
        assert_eq!(store.credit_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_save_issues_no_reward() {
        let (ledger, store) = ledger_with(InMemoryStore::new().with_quest(&owner(), daily("d", 1, 1)));
        let chore = ledger.add_chore(&owner(), "Dishes", None, None, Utc::now()).await.unwrap();

        store.fail_operation(StoreOperation::SaveChores);
        let err = ledger.toggle_chore(&owner(), &chore.id, Utc::now()).await.unwrap_err();
        assert!(err.is_persistence());

        assert_eq!(ledger.balance(&owner()).await.unwrap(), 0);
        let quests = ledger.quests(&owner()).await.unwrap();
        assert_eq!(quests[0].current_progress, 0);
        assert!(!ledger.chores(&owner()).await.unwrap()[0].completed);
    }

    #[tokio::test]
    async fn test_transaction_log_failure_not_propagated() {
        let (ledger, store) = ledger_with(InMemoryStore::new());
        let chore = ledger.add_chore(&owner(), "Dishes", None, None, Utc::now()).await.unwrap();

        store.fail_operation(StoreOperation::RecordTransaction);
        let outcome = ledger.toggle_chore(&owner(), &chore.id, Utc::now()).await.unwrap();
        assert_eq!(outcome.rewards.balance, 10);

        store.restore_operation(StoreOperation::RecordTransaction);
        assert!(ledger.transactions(&owner()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apply_update_rejects_cleared_flag() {
        let (ledger, _) = ledger_with(InMemoryStore::new());
        let chore = ledger.add_chore(&owner(), "Dishes", None, None, Utc::now()).await.unwrap();
        ledger.toggle_chore(&owner(), &chore.id, Utc::now()).await.unwrap();
        ledger.toggle_chore(&owner(), &chore.id, Utc::now()).await.unwrap();

        let mut edited = ledger.chores(&owner()).await.unwrap();
        edited[0].completed_before = false;

        assert!(matches!(
            ledger.apply_chore_update(&owner(), edited).await,
            Err(LedgerError::InvalidRecord(_))
        ));
    }

    #[tokio::test]
    async fn test_purchase_refunds_when_inventory_save_fails() {
        let (ledger, store) = ledger_with(InMemoryStore::new().with_currency(&owner(), 100));

        store.fail_operation(StoreOperation::SaveDecorations);
        assert!(ledger.purchase_decoration(&owner(), "halloween").await.is_err());
        assert_eq!(ledger.balance(&owner()).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_members() {
        let (ledger, _) = ledger_with(InMemoryStore::new());
        let family = owner();

        let alex = ledger.add_member(&family, "Alex", Utc::now()).await.unwrap();
        ledger.add_member(&family, "Sam", Utc::now()).await.unwrap();
        assert!(ledger.add_member(&family, " ", Utc::now()).await.is_err());

        let renamed = ledger.rename_member(&family, &alex.id, "Alexis").await.unwrap();
        assert_eq!(renamed.name, "Alexis");

        ledger.remove_member(&family, &alex.id).await.unwrap();
        let names: Vec<String> = ledger
            .members(&family)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Sam".to_string()]);

        let other_family = OwnerId::new("other");
        assert!(matches!(
            ledger.remove_member(&other_family, &renamed.id).await,
            Err(LedgerError::NotFound(_))
        ));
    }
}
