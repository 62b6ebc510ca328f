//! Error types for ledger operations.

/// Main error type for ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Referenced chore, quest, member or decoration is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Quest claim attempted before the quest reached its target
    #[error("Quest not completed yet: {0}")]
    NotReady(String),

    /// Quest reward was already claimed
    #[error("Reward already claimed: {0}")]
    AlreadyClaimed(String),

    /// Debit exceeds the current balance
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    /// Decoration is already in the owner's inventory
    #[error("Already owned: {0}")]
    AlreadyOwned(String),

    /// Decoration is not in the owner's inventory
    #[error("Not owned: {0}")]
    NotOwned(String),

    /// Record failed validation at the persistence boundary
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Access code rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backing store call failed (network, timeout, permission)
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

impl LedgerError {
    /// Whether the error came from the backing store rather than ledger rules.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRecord(format!("JSON error: {}", err))
    }
}

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
