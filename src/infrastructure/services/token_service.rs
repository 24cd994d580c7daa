use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::principal::PrincipalType;
use crate::domain::token::{AuthToken, TokenRepository};
use crate::domain::DomainError;

/// Persists refresh and reset tokens and enforces their database-side expiry.
#[derive(Debug, Clone)]
pub struct TokenService {
    tokens: Arc<dyn TokenRepository>,
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>) -> Self {
        Self { tokens }
    }

    /// Store a freshly signed token with the given lifetime.
    pub async fn store(
        &self,
        principal_type: PrincipalType,
        principal_id: i64,
        token: String,
        ttl_secs: i64,
    ) -> Result<AuthToken, DomainError> {
        let expires_at = Utc::now() + Duration::seconds(ttl_secs);
        let token = AuthToken::new(principal_type, principal_id, token, expires_at)?;
        self.tokens.create(token).await
    }

    /// Load a stored token; absent rows are a not-found, expired rows a
    /// credential failure.
    pub async fn retrieve_valid(
        &self,
        principal_type: PrincipalType,
        token: &str,
    ) -> Result<AuthToken, DomainError> {
        let stored = self
            .tokens
            .get_by_token(principal_type, token)
            .await?
            .ok_or_else(|| DomainError::not_found("Refresh token could not be found"))?;

        if stored.is_expired(Utc::now()) {
            let _ = self.tokens.delete_by_token(principal_type, token).await;
            return Err(DomainError::credential("Refresh token has expired"));
        }

        Ok(stored)
    }

    pub async fn delete(
        &self,
        principal_type: PrincipalType,
        token: &str,
    ) -> Result<(), DomainError> {
        if !self.tokens.delete_by_token(principal_type, token).await? {
            return Err(DomainError::not_found("Refresh token could not be found"));
        }
        Ok(())
    }

    pub async fn delete_for_principal(
        &self,
        principal_type: PrincipalType,
        principal_id: i64,
    ) -> Result<u64, DomainError> {
        self.tokens
            .delete_for_principal(principal_type, principal_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::in_memory::InMemoryTokenRepository;

    fn service() -> TokenService {
        TokenService::new(Arc::new(InMemoryTokenRepository::new()))
    }

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let service = service();
        service
            .store(PrincipalType::Member, 1, "jwt-string".to_string(), 900)
            .await
            .unwrap();

        let stored = service
            .retrieve_valid(PrincipalType::Member, "jwt-string")
            .await
            .unwrap();
        assert_eq!(stored.principal_id, 1);
    }

    #[tokio::test]
    async fn test_retrieve_missing_is_not_found() {
        let result = service()
            .retrieve_valid(PrincipalType::Member, "nope")
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_retrieve_expired_is_credential_error() {
        let service = service();
        service
            .store(PrincipalType::Provider, 2, "stale".to_string(), -60)
            .await
            .unwrap();

        let result = service.retrieve_valid(PrincipalType::Provider, "stale").await;
        assert!(matches!(result, Err(DomainError::Credential { .. })));

        // the expired row is gone afterwards
        let result = service.retrieve_valid(PrincipalType::Provider, "stale").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_type_scoping() {
        let service = service();
        service
            .store(PrincipalType::Member, 1, "jwt-string".to_string(), 900)
            .await
            .unwrap();

        let result = service
            .retrieve_valid(PrincipalType::Provider, "jwt-string")
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = service();
        service
            .store(PrincipalType::Member, 1, "jwt-string".to_string(), 900)
            .await
            .unwrap();

        service
            .delete(PrincipalType::Member, "jwt-string")
            .await
            .unwrap();
        let result = service.delete(PrincipalType::Member, "jwt-string").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
