//! Chore records: creation, the completion toggle, and list validation.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

use crate::error::{LedgerError, Result};
use crate::types::{Chore, OwnerId, Priority};

impl Chore {
    /// Create an incomplete, never-completed chore for an owner.
    ///
    /// Ids are prefixed with the owner so they stay readable in stored documents.
    pub fn new(owner: &OwnerId, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}_{}", owner, uuid::Uuid::new_v4().simple()),
            title: title.into(),
            completed: false,
            completed_at: None,
            completed_before: false,
            created_at: now,
            priority: Priority::default(),
            due_date: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Return the chore with its completion state flipped.
    pub fn toggled(&self, now: DateTime<Utc>) -> Self {
        toggle_completion(self, now)
    }
}

/// Flip a chore's completion state.
///
/// Checking sets `completed_at` and the sticky `completed_before` flag.
/// Unchecking clears `completed_at` only; `completed_before` never reverts.
pub fn toggle_completion(chore: &Chore, now: DateTime<Utc>) -> Chore {
    if chore.completed {
        Chore {
            completed: false,
            completed_at: None,
            ..chore.clone()
        }
    } else {
        Chore {
            completed: true,
            completed_at: Some(now),
            completed_before: true,
            ..chore.clone()
        }
    }
}

/// Check a chore list against the record invariants.
pub fn validate_chores(chores: &[Chore]) -> Result<()> {
    let mut seen = HashSet::with_capacity(chores.len());

    for chore in chores {
        if chore.id.trim().is_empty() {
            return Err(LedgerError::InvalidRecord("chore id is empty".to_string()));
        }
        if !seen.insert(chore.id.as_str()) {
            return Err(LedgerError::InvalidRecord(format!(
                "duplicate chore id '{}'",
                chore.id
            )));
        }
        if chore.title.trim().is_empty() {
            return Err(LedgerError::InvalidRecord(format!(
                "chore '{}' has an empty title",
                chore.id
            )));
        }
        if chore.completed && !chore.completed_before {
            return Err(LedgerError::InvalidRecord(format!(
                "chore '{}' is completed but not marked completedBefore",
                chore.id
            )));
        }
        if chore.completed != chore.completed_at.is_some() {
            return Err(LedgerError::InvalidRecord(format!(
                "chore '{}' has completedAt out of step with completed",
                chore.id
            )));
        }
    }

    Ok(())
}

/// Parse and validate a JSON array of chores.
pub fn parse_chore_list(json: &str) -> Result<Vec<Chore>> {
    let chores: Vec<Chore> = serde_json::from_str(json)?;
    validate_chores(&chores)?;
    Ok(chores)
}

/// Clean up a user-entered title, rejecting blank input.
pub(crate) fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidRecord(
            "Please enter a chore name".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
