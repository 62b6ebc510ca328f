//! Shared access code verification and the explicit login session.
//!
//! Access codes are stored as Argon2id PHC strings. A successful login yields a
//! [`Session`] that callers pass to whatever needs the owner id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::types::OwnerId;

/// Hash an access code using Argon2id.
pub fn hash_access_code(code: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(code.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LedgerError::Unauthorized(format!("Failed to hash access code: {e}")))
}

/// Verify an access code against a stored hash.
pub fn verify_access_code(code: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| LedgerError::Unauthorized(format!("Invalid access code hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(code.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Logged-in household context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub family_id: OwnerId,
    /// Selected member, if acting on a member's own list
    pub member_id: Option<OwnerId>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session after checking the shared access code.
    pub fn login(code: &str, code_hash: &str, family_id: OwnerId) -> Result<Self> {
        if !verify_access_code(code, code_hash)? {
            tracing::warn!(family = %family_id, "Rejected access code");
            return Err(LedgerError::Unauthorized(
                "Invalid code. Please try again.".to_string(),
            ));
        }

        tracing::info!(family = %family_id, "Session started");
        Ok(Self {
            family_id,
            member_id: None,
            started_at: Utc::now(),
        })
    }

    /// Act on a member's list instead of the family list.
    pub fn with_member(mut self, member_id: OwnerId) -> Self {
        self.member_id = Some(member_id);
        self
    }

    /// Owner whose chores, quests and balance this session works with.
    pub fn owner(&self) -> &OwnerId {
        self.member_id.as_ref().unwrap_or(&self.family_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_access_code("123456").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_access_code("123456", &hash).unwrap());
        assert!(!verify_access_code("654321", &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(verify_access_code("123456", "plaintext").is_err());
    }

    #[test]
    fn test_login_owner_resolution() {
        let hash = hash_access_code("123456").unwrap();
        let session = Session::login("123456", &hash, OwnerId::new("family")).unwrap();
        assert_eq!(session.owner().as_str(), "family");

        let member = session.with_member(OwnerId::new("member-2"));
        assert_eq!(member.owner().as_str(), "member-2");
        assert_eq!(member.family_id.as_str(), "family");
    }

    #[test]
    fn test_login_wrong_code() {
        let hash = hash_access_code("123456").unwrap();
        let err = Session::login("000000", &hash, OwnerId::new("family")).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized(_)));
    }
}
