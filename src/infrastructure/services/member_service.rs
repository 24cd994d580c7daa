use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::domain::image::{Image, ImageOwner};
use crate::domain::member::{Member, MemberRepository};
use crate::domain::principal::PrincipalType;
use crate::domain::token::TokenRepository;
use crate::domain::DomainError;
use crate::infrastructure::auth::PasswordHasher;
use crate::infrastructure::services::image_service::{FileUpload, ImageService};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 25))]
    pub first_name: String,
    #[validate(length(min = 1, max = 25))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Member account management.
#[derive(Debug, Clone)]
pub struct MemberService {
    members: Arc<dyn MemberRepository>,
    tokens: Arc<dyn TokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    images: Arc<ImageService>,
}

impl MemberService {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        tokens: Arc<dyn TokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
        images: Arc<ImageService>,
    ) -> Self {
        Self {
            members,
            tokens,
            hasher,
            images,
        }
    }

    pub async fn find(&self, id: i64) -> Result<Member, DomainError> {
        self.members
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Member '{}' not found", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Member>, DomainError> {
        self.members.get_by_email(email).await
    }

    pub async fn create(&self, request: CreateMemberRequest) -> Result<Member, DomainError> {
        if self.members.exists_by_email(&request.email).await? {
            return Err(DomainError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let member = Member::new(
            request.first_name,
            request.last_name,
            password_hash,
            request.email,
            request.birthday,
        )?;

        self.members.create(member).await
    }

    pub async fn update(&self, id: i64, request: UpdateMemberRequest) -> Result<Member, DomainError> {
        let mut member = self.find(id).await?;

        if let Some(email) = request.email {
            if email != member.email() {
                if self.members.exists_by_email(&email).await? {
                    return Err(DomainError::conflict("Email already taken"));
                }
                member.set_email(email)?;
            }
        }
        if let Some(first_name) = request.first_name {
            member.set_first_name(first_name)?;
        }
        if let Some(last_name) = request.last_name {
            member.set_last_name(last_name)?;
        }
        if let Some(birthday) = request.birthday {
            member.set_birthday(Some(birthday));
        }

        self.members.update(&member).await?;
        Ok(member)
    }

    pub async fn update_password(&self, id: i64, new_password: &str) -> Result<(), DomainError> {
        let mut member = self.find(id).await?;
        member.set_password_hash(self.hasher.hash(new_password)?);
        self.members.update(&member).await
    }

    /// Remove the account along with its profile image and stored tokens.
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let member = self.find(id).await?;

        if let Some(image_id) = member.profile_image_id() {
            self.images.delete_by_id(image_id).await?;
        }
        self.tokens
            .delete_for_principal(PrincipalType::Member, id)
            .await?;

        if !self.members.delete(id).await? {
            return Err(DomainError::not_found(format!("Member '{}' not found", id)));
        }
        Ok(())
    }

    /// Store a new profile image, replacing (and deleting) any previous one.
    pub async fn upload_profile_image(
        &self,
        member_id: i64,
        file: &FileUpload,
    ) -> Result<Image, DomainError> {
        let mut member = self.find(member_id).await?;

        if let Some(old_id) = member.profile_image_id() {
            member.set_profile_image_id(None);
            self.members.update(&member).await?;
            self.images.delete_by_id(old_id).await?;
        }

        let image = self
            .images
            .upload(ImageOwner::Member(member_id), file)
            .await?;
        member.set_profile_image_id(Some(image.id));
        self.members.update(&member).await?;

        Ok(image)
    }

    pub async fn delete_profile_image(&self, member_id: i64) -> Result<(), DomainError> {
        let mut member = self.find(member_id).await?;

        let image_id = member.profile_image_id().ok_or_else(|| {
            DomainError::validation("User does not have a profile image")
        })?;

        member.set_profile_image_id(None);
        self.members.update(&member).await?;
        self.images.delete_by_id(image_id).await
    }

    pub async fn profile_image(&self, member: &Member) -> Result<Option<Image>, DomainError> {
        match member.profile_image_id() {
            Some(id) => Ok(Some(self.images.find(id).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::Argon2Hasher;
    use crate::infrastructure::object_storage::InMemoryObjectStore;
    use crate::infrastructure::repositories::in_memory::{
        InMemoryImageRepository, InMemoryMemberRepository, InMemoryTokenRepository,
    };

    fn service() -> MemberService {
        let images = Arc::new(ImageService::new(
            Arc::new(InMemoryImageRepository::new()),
            Arc::new(InMemoryObjectStore::new()),
        ));
        MemberService::new(
            Arc::new(InMemoryMemberRepository::new()),
            Arc::new(InMemoryTokenRepository::new()),
            Arc::new(Argon2Hasher),
            images,
        )
    }

    fn create_request() -> CreateMemberRequest {
        CreateMemberRequest {
            first_name: "Anna".to_string(),
            last_name: "Muster".to_string(),
            email: "anna@example.com".to_string(),
            password: "s3cret".to_string(),
            birthday: None,
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let service = service();
        let member = service.create(create_request()).await.unwrap();

        assert!(member.id() > 0);
        assert_ne!(member.password_hash(), "s3cret");
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let service = service();
        service.create(create_request()).await.unwrap();

        let result = service.create(create_request()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let service = service();
        service.create(create_request()).await.unwrap();

        let mut other = create_request();
        other.email = "beat@example.com".to_string();
        let beat = service.create(other).await.unwrap();

        let result = service
            .update(
                beat.id(),
                UpdateMemberRequest {
                    email: Some("anna@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_applies_fields() {
        let service = service();
        let member = service.create(create_request()).await.unwrap();

        let updated = service
            .update(
                member.id(),
                UpdateMemberRequest {
                    first_name: Some("Annika".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name(), "Annika");
        assert_eq!(updated.email(), "anna@example.com");
    }

    #[tokio::test]
    async fn test_delete_missing_member() {
        let result = service().delete(99).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_profile_image_replace_and_delete() {
        let service = service();
        let member = service.create(create_request()).await.unwrap();

        let file = FileUpload {
            file_name: "me.png".to_string(),
            bytes: vec![1],
        };
        let first = service
            .upload_profile_image(member.id(), &file)
            .await
            .unwrap();
        let second = service
            .upload_profile_image(member.id(), &file)
            .await
            .unwrap();
        assert_ne!(first.id, second.id);

        let member = service.find(member.id()).await.unwrap();
        assert_eq!(member.profile_image_id(), Some(second.id));

        service.delete_profile_image(member.id()).await.unwrap();
        let result = service.delete_profile_image(member.id()).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
