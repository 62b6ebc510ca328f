//! TIDY Ledger - chore completion rewards
//!
//! Tracks household chore lists and pays out for them:
//! - First-time completion detection keyed by chore id
//! - Per-chore currency credits through atomic store increments
//! - Daily and weekly quests advanced by completions, claimed once
//! - Decoration shop spending the earned coins
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              ChoreLedger                │
//! │  (toggle, apply update, claim, shop)    │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │ detection / │       │ LedgerStore │
//! │ quest rules │       │ (Mongo /    │
//! │             │       │  memory)    │
//! └─────────────┘       └─────────────┘
//! ```

pub mod chore;
pub mod config;
pub mod detection;
pub mod error;
pub mod ledger;
pub mod quest;
pub mod session;
pub mod shop;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use chore::{parse_chore_list, toggle_completion, validate_chores};
pub use config::{LedgerConfig, DEFAULT_CHORE_REWARD};
pub use detection::first_time_completions;
pub use error::{LedgerError, Result};
pub use ledger::{ChoreLedger, ClaimReceipt, QuestProgress, RewardSummary, ToggleOutcome};
pub use quest::{check_claimable, default_templates, sort_quests, QuestTemplate};
pub use session::{hash_access_code, verify_access_code, Session};
pub use shop::{catalog, Decoration, DecorationInventory, ShopItem};
pub use store::{InMemoryStore, LedgerStore, StoreOperation};
pub use types::*;
