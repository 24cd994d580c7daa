use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::principal::PrincipalType;
use crate::domain::token::AuthToken;

#[async_trait]
pub trait TokenRepository: Send + Sync + std::fmt::Debug {
    async fn get_by_token(
        &self,
        principal_type: PrincipalType,
        token: &str,
    ) -> Result<Option<AuthToken>, DomainError>;

    async fn create(&self, token: AuthToken) -> Result<AuthToken, DomainError>;

    async fn delete_by_token(
        &self,
        principal_type: PrincipalType,
        token: &str,
    ) -> Result<bool, DomainError>;

    /// Drop every token a principal owns (used when the account is deleted).
    async fn delete_for_principal(
        &self,
        principal_type: PrincipalType,
        principal_id: i64,
    ) -> Result<u64, DomainError>;
}
