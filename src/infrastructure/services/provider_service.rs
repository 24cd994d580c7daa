use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::domain::course::CourseRepository;
use crate::domain::course_date::CourseDateRepository;
use crate::domain::image::{Image, ImageOwner};
use crate::domain::link::{Link, LinkRepository};
use crate::domain::principal::PrincipalType;
use crate::domain::provider::{Address, Provider, ProviderRepository};
use crate::domain::token::TokenRepository;
use crate::domain::DomainError;
use crate::infrastructure::auth::PasswordHasher;
use crate::infrastructure::services::image_service::{FileUpload, ImageService};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub street: String,
    pub zip: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    pub link_text: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub description: String,
    pub price: Decimal,
    #[validate(length(min = 1, max = 25))]
    pub contact_person: String,
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 25))]
    pub category: String,
    pub address: AddressRequest,
    #[serde(default)]
    pub links: Vec<LinkRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub contact_person: Option<String>,
    pub phone_number: Option<String>,
    pub category: Option<String>,
    pub needs_approval: Option<bool>,
    pub is_published: Option<bool>,
    pub address: Option<AddressRequest>,
    /// When present, replaces the provider's link list.
    pub links: Option<Vec<LinkRequest>>,
}

/// Provider account management, including the owned address, links, courses
/// and slideshow images.
#[derive(Debug, Clone)]
pub struct ProviderService {
    providers: Arc<dyn ProviderRepository>,
    links: Arc<dyn LinkRepository>,
    courses: Arc<dyn CourseRepository>,
    course_dates: Arc<dyn CourseDateRepository>,
    tokens: Arc<dyn TokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    images: Arc<ImageService>,
}

impl ProviderService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        providers: Arc<dyn ProviderRepository>,
        links: Arc<dyn LinkRepository>,
        courses: Arc<dyn CourseRepository>,
        course_dates: Arc<dyn CourseDateRepository>,
        tokens: Arc<dyn TokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
        images: Arc<ImageService>,
    ) -> Self {
        Self {
            providers,
            links,
            courses,
            course_dates,
            tokens,
            hasher,
            images,
        }
    }

    pub async fn find(&self, id: i64) -> Result<Provider, DomainError> {
        self.providers
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Provider '{}' not found", id)))
    }

    /// Public lookup: unpublished providers are invisible.
    pub async fn find_published(&self, id: i64) -> Result<Provider, DomainError> {
        let provider = self.find(id).await?;
        if !provider.is_published() {
            return Err(DomainError::not_found(format!(
                "Provider '{}' not found",
                id
            )));
        }
        Ok(provider)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Provider>, DomainError> {
        self.providers.get_by_email(email).await
    }

    pub async fn list_published(&self) -> Result<Vec<Provider>, DomainError> {
        self.providers.list_published().await
    }

    pub async fn list_for_member(&self, member_id: i64) -> Result<Vec<Provider>, DomainError> {
        self.providers.list_for_member(member_id).await
    }

    pub async fn create(&self, request: CreateProviderRequest) -> Result<Provider, DomainError> {
        if self.providers.exists_by_email(&request.email).await? {
            return Err(DomainError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let provider = Provider::new(
            request.name,
            request.email,
            password_hash,
            request.description,
            request.price,
            request.contact_person,
            request.phone_number,
            request.category,
        )?;

        let provider = self.providers.create(provider).await?;

        let address = Address::new(
            provider.id(),
            request.address.street,
            request.address.zip,
            request.address.city,
            request.address.country,
        )?;
        self.providers.upsert_address(address).await?;

        for link in request.links {
            self.links
                .create(Link::new(provider.id(), link.link_text, link.url)?)
                .await?;
        }

        Ok(provider)
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateProviderRequest,
    ) -> Result<Provider, DomainError> {
        let mut provider = self.find(id).await?;

        if let Some(email) = request.email {
            if email != provider.email() {
                if self.providers.exists_by_email(&email).await? {
                    return Err(DomainError::conflict("Email already taken"));
                }
                provider.set_email(email)?;
            }
        }
        if let Some(name) = request.name {
            provider.set_name(name)?;
        }
        if let Some(description) = request.description {
            provider.set_description(description);
        }
        if let Some(price) = request.price {
            provider.set_price(price)?;
        }
        if let Some(contact_person) = request.contact_person {
            provider.set_contact_person(contact_person)?;
        }
        if let Some(phone_number) = request.phone_number {
            provider.set_phone_number(Some(phone_number))?;
        }
        if let Some(category) = request.category {
            provider.set_category(category)?;
        }
        if let Some(needs_approval) = request.needs_approval {
            provider.set_needs_approval(needs_approval);
        }
        if let Some(is_published) = request.is_published {
            provider.set_is_published(is_published);
        }

        self.providers.update(&provider).await?;

        if let Some(address) = request.address {
            let address = Address::new(
                id,
                address.street,
                address.zip,
                address.city,
                address.country,
            )?;
            self.providers.upsert_address(address).await?;
        }

        if let Some(links) = request.links {
            for existing in self.links.list_for_provider(id).await? {
                self.links.delete(existing.id).await?;
            }
            for link in links {
                self.links
                    .create(Link::new(id, link.link_text, link.url)?)
                    .await?;
            }
        }

        Ok(provider)
    }

    pub async fn update_password(&self, id: i64, new_password: &str) -> Result<(), DomainError> {
        let mut provider = self.find(id).await?;
        provider.set_password_hash(self.hasher.hash(new_password)?);
        self.providers.update(&provider).await
    }

    /// Delete the account and everything it owns. Course and slideshow images
    /// live in object storage, so they are removed explicitly before the row
    /// cascade runs.
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.find(id).await?;

        for course in self.courses.list_for_provider(id).await? {
            self.images
                .delete_for_owner(ImageOwner::Course(course.id))
                .await?;
            self.course_dates.delete_for_course(course.id).await?;
            self.courses.delete(course.id).await?;
        }

        self.images
            .delete_for_owner(ImageOwner::Provider(id))
            .await?;
        for link in self.links.list_for_provider(id).await? {
            self.links.delete(link.id).await?;
        }
        self.tokens
            .delete_for_principal(PrincipalType::Provider, id)
            .await?;

        if !self.providers.delete(id).await? {
            return Err(DomainError::not_found(format!(
                "Provider '{}' not found",
                id
            )));
        }
        Ok(())
    }

    pub async fn address(&self, provider_id: i64) -> Result<Option<Address>, DomainError> {
        self.providers.get_address(provider_id).await
    }

    pub async fn links(&self, provider_id: i64) -> Result<Vec<Link>, DomainError> {
        self.links.list_for_provider(provider_id).await
    }

    pub async fn delete_link(&self, link_id: i64) -> Result<(), DomainError> {
        if !self.links.delete(link_id).await? {
            return Err(DomainError::not_found(format!(
                "Link '{}' not found",
                link_id
            )));
        }
        Ok(())
    }

    pub async fn slideshow(&self, provider_id: i64) -> Result<Vec<Image>, DomainError> {
        self.images
            .list_for_owner(ImageOwner::Provider(provider_id))
            .await
    }

    pub async fn profile_image(&self, provider: &Provider) -> Result<Option<Image>, DomainError> {
        match provider.profile_image_id() {
            Some(id) => Ok(Some(self.images.find(id).await?)),
            None => Ok(None),
        }
    }

    pub async fn upload_slideshow_image(
        &self,
        provider_id: i64,
        file: &FileUpload,
    ) -> Result<Image, DomainError> {
        self.find(provider_id).await?;
        self.images
            .upload(ImageOwner::Provider(provider_id), file)
            .await
    }

    /// Mark one of the provider's slideshow images as the profile image.
    pub async fn set_profile_image(
        &self,
        provider_id: i64,
        image_id: i64,
    ) -> Result<Image, DomainError> {
        let mut provider = self.find(provider_id).await?;
        let image = self.images.find(image_id).await?;
        if image.owner != ImageOwner::Provider(provider_id) {
            return Err(DomainError::not_found(format!(
                "Image '{}' not found",
                image_id
            )));
        }

        provider.set_profile_image_id(Some(image.id));
        self.providers.update(&provider).await?;
        Ok(image)
    }

    /// Delete a slideshow image. When the deleted image was the profile
    /// image, the first remaining slideshow image takes its place.
    pub async fn delete_image(&self, provider_id: i64, image_id: i64) -> Result<(), DomainError> {
        let mut provider = self.find(provider_id).await?;

        let image = match self.images.find(image_id).await {
            Ok(image) if image.owner == ImageOwner::Provider(provider_id) => image,
            _ => {
                return Err(DomainError::validation(
                    "Image could not be found in the slideshow",
                ))
            }
        };

        let was_profile = provider.profile_image_id() == Some(image.id);
        if was_profile {
            provider.set_profile_image_id(None);
            self.providers.update(&provider).await?;
        }
        self.images.delete(&image).await?;

        if was_profile {
            let slideshow = self.slideshow(provider_id).await?;
            if let Some(first) = slideshow.first() {
                provider.set_profile_image_id(Some(first.id));
                self.providers.update(&provider).await?;
            }
        }

        Ok(())
    }
}
