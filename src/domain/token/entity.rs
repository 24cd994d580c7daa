use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::principal::PrincipalType;
use crate::domain::validation;

/// A persisted token row. Used for refresh tokens and for password-reset
/// tokens; both are JWT strings with a database-side expiry.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub principal_type: PrincipalType,
    pub principal_id: i64,
}

impl AuthToken {
    pub fn new(
        principal_type: PrincipalType,
        principal_id: i64,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validation::require_text("token", &token, 1000)?;

        Ok(Self {
            id: 0,
            token,
            expires_at,
            principal_type,
            principal_id,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
