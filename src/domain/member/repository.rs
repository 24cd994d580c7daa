use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::member::Member;

/// Persistence boundary for members.
#[async_trait]
pub trait MemberRepository: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: i64) -> Result<Option<Member>, DomainError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<Member>, DomainError>;

    /// Store a new member and return it with its assigned id.
    async fn create(&self, member: Member) -> Result<Member, DomainError>;

    async fn update(&self, member: &Member) -> Result<(), DomainError>;

    /// Returns `false` when no row matched.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
