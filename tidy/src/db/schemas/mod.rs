//! Database schemas for the TIDY ledger
//!
//! Documents are converted into ledger types through `TryFrom`, which is where
//! stored records are validated.

mod member;
mod metadata;
mod owner;
mod quest;
mod transaction;

pub use member::{MemberDoc, MEMBER_COLLECTION};
pub use metadata::Metadata;
pub use owner::{OwnerDoc, OWNER_COLLECTION};
pub use quest::{QuestDoc, QUEST_COLLECTION};
pub use transaction::{TransactionDoc, TRANSACTION_COLLECTION};

use tidy_ledger::{LedgerError, Result};

/// Stored counters are i64; ledger amounts are unsigned.
pub(crate) fn to_stored(value: u64, field: &str) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| LedgerError::InvalidRecord(format!("{} {} is out of range", field, value)))
}

pub(crate) fn from_stored<T: TryFrom<i64>>(value: i64, field: &str) -> Result<T> {
    T::try_from(value)
        .map_err(|_| LedgerError::InvalidRecord(format!("{} {} is out of range", field, value)))
}

pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| LedgerError::InvalidRecord(format!("{} is missing", field)))
}
