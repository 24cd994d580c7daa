//! In-memory repositories backing the unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::domain::course::{Course, CourseRepository};
use crate::domain::course_date::{CourseDate, CourseDateRepository};
use crate::domain::image::{Image, ImageOwner, ImageRepository};
use crate::domain::link::{Link, LinkRepository};
use crate::domain::member::{Member, MemberRepository};
use crate::domain::principal::PrincipalType;
use crate::domain::provider::{Address, Provider, ProviderRepository};
use crate::domain::token::{AuthToken, TokenRepository};
use crate::domain::DomainError;

fn lock_err() -> DomainError {
    DomainError::internal("Repository lock poisoned")
}

#[derive(Debug, Default)]
pub struct InMemoryMemberRepository {
    members: Mutex<Vec<Member>>,
    next_id: AtomicI64,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn get(&self, id: i64) -> Result<Option<Member>, DomainError> {
        let members = self.members.lock().map_err(|_| lock_err())?;
        Ok(members.iter().find(|m| m.id() == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Member>, DomainError> {
        let members = self.members.lock().map_err(|_| lock_err())?;
        Ok(members.iter().find(|m| m.email() == email).cloned())
    }

    async fn create(&self, member: Member) -> Result<Member, DomainError> {
        let mut members = self.members.lock().map_err(|_| lock_err())?;
        if members.iter().any(|m| m.email() == member.email()) {
            return Err(DomainError::conflict("Email already taken"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Member::restore(
            id,
            member.first_name().to_string(),
            member.last_name().to_string(),
            member.password_hash().to_string(),
            member.email().to_string(),
            member.birthday(),
            member.profile_image_id(),
        );
        members.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, member: &Member) -> Result<(), DomainError> {
        let mut members = self.members.lock().map_err(|_| lock_err())?;
        match members.iter_mut().find(|m| m.id() == member.id()) {
            Some(slot) => {
                *slot = member.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Member '{}' not found",
                member.id()
            ))),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut members = self.members.lock().map_err(|_| lock_err())?;
        let before = members.len();
        members.retain(|m| m.id() != id);
        Ok(members.len() < before)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProviderRepository {
    providers: Mutex<Vec<Provider>>,
    addresses: Mutex<Vec<Address>>,
    /// (member_id, provider_id) association pairs
    member_links: Mutex<Vec<(i64, i64)>>,
    next_id: AtomicI64,
}

impl InMemoryProviderRepository {
    pub fn new() -> Self {
        Self {
            providers: Mutex::new(Vec::new()),
            addresses: Mutex::new(Vec::new()),
            member_links: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn associate_member(&self, member_id: i64, provider_id: i64) {
        if let Ok(mut links) = self.member_links.lock() {
            links.push((member_id, provider_id));
        }
    }
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn get(&self, id: i64) -> Result<Option<Provider>, DomainError> {
        let providers = self.providers.lock().map_err(|_| lock_err())?;
        Ok(providers.iter().find(|p| p.id() == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Provider>, DomainError> {
        let providers = self.providers.lock().map_err(|_| lock_err())?;
        Ok(providers.iter().find(|p| p.email() == email).cloned())
    }

    async fn create(&self, provider: Provider) -> Result<Provider, DomainError> {
        let mut providers = self.providers.lock().map_err(|_| lock_err())?;
        if providers.iter().any(|p| p.email() == provider.email()) {
            return Err(DomainError::conflict("Email already taken"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Provider::restore(
            id,
            provider.name().to_string(),
            provider.email().to_string(),
            provider.password_hash().to_string(),
            provider.description().to_string(),
            provider.price(),
            provider.contact_person().to_string(),
            provider.phone_number().map(str::to_string),
            provider.category().to_string(),
            provider.needs_approval(),
            provider.is_published(),
            provider.profile_image_id(),
        );
        providers.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, provider: &Provider) -> Result<(), DomainError> {
        let mut providers = self.providers.lock().map_err(|_| lock_err())?;
        match providers.iter_mut().find(|p| p.id() == provider.id()) {
            Some(slot) => {
                *slot = provider.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Provider '{}' not found",
                provider.id()
            ))),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut providers = self.providers.lock().map_err(|_| lock_err())?;
        let before = providers.len();
        providers.retain(|p| p.id() != id);

        let mut addresses = self.addresses.lock().map_err(|_| lock_err())?;
        addresses.retain(|a| a.provider_id != id);

        Ok(providers.len() < before)
    }

    async fn list_published(&self) -> Result<Vec<Provider>, DomainError> {
        let providers = self.providers.lock().map_err(|_| lock_err())?;
        Ok(providers
            .iter()
            .filter(|p| p.is_published())
            .cloned()
            .collect())
    }

    async fn list_for_member(&self, member_id: i64) -> Result<Vec<Provider>, DomainError> {
        let links = self.member_links.lock().map_err(|_| lock_err())?;
        let ids: Vec<i64> = links
            .iter()
            .filter(|(m, _)| *m == member_id)
            .map(|(_, p)| *p)
            .collect();
        drop(links);

        let providers = self.providers.lock().map_err(|_| lock_err())?;
        Ok(providers
            .iter()
            .filter(|p| ids.contains(&p.id()))
            .cloned()
            .collect())
    }

    async fn get_address(&self, provider_id: i64) -> Result<Option<Address>, DomainError> {
        let addresses = self.addresses.lock().map_err(|_| lock_err())?;
        Ok(addresses
            .iter()
            .find(|a| a.provider_id == provider_id)
            .cloned())
    }

    async fn upsert_address(&self, address: Address) -> Result<Address, DomainError> {
        let mut addresses = self.addresses.lock().map_err(|_| lock_err())?;
        if let Some(slot) = addresses
            .iter_mut()
            .find(|a| a.provider_id == address.provider_id)
        {
            let stored = Address {
                id: slot.id,
                ..address
            };
            *slot = stored.clone();
            return Ok(stored);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Address { id, ..address };
        addresses.push(stored.clone());
        Ok(stored)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    courses: Mutex<Vec<Course>>,
    /// course_id -> enrolled member ids
    enrollment: Mutex<HashMap<i64, Vec<i64>>>,
    published_providers: Mutex<Vec<i64>>,
    next_id: AtomicI64,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self {
            courses: Mutex::new(Vec::new()),
            enrollment: Mutex::new(HashMap::new()),
            published_providers: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// The real repository joins on the providers table for `list_published`;
    /// tests register published provider ids here instead.
    pub fn mark_provider_published(&self, provider_id: i64) {
        if let Ok(mut ids) = self.published_providers.lock() {
            ids.push(provider_id);
        }
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn get(&self, id: i64) -> Result<Option<Course>, DomainError> {
        let courses = self.courses.lock().map_err(|_| lock_err())?;
        Ok(courses.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, course: Course) -> Result<Course, DomainError> {
        let mut courses = self.courses.lock().map_err(|_| lock_err())?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Course { id, ..course };
        courses.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let mut courses = self.courses.lock().map_err(|_| lock_err())?;
        match courses.iter_mut().find(|c| c.id == course.id) {
            Some(slot) => {
                *slot = course.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Course '{}' not found",
                course.id
            ))),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut courses = self.courses.lock().map_err(|_| lock_err())?;
        let before = courses.len();
        courses.retain(|c| c.id != id);

        let mut enrollment = self.enrollment.lock().map_err(|_| lock_err())?;
        enrollment.remove(&id);

        Ok(courses.len() < before)
    }

    async fn list_published(&self) -> Result<Vec<Course>, DomainError> {
        let published = self.published_providers.lock().map_err(|_| lock_err())?;
        let courses = self.courses.lock().map_err(|_| lock_err())?;
        Ok(courses
            .iter()
            .filter(|c| c.is_published && published.contains(&c.provider_id))
            .cloned()
            .collect())
    }

    async fn list_for_provider(&self, provider_id: i64) -> Result<Vec<Course>, DomainError> {
        let courses = self.courses.lock().map_err(|_| lock_err())?;
        Ok(courses
            .iter()
            .filter(|c| c.provider_id == provider_id)
            .cloned()
            .collect())
    }

    async fn list_for_member(&self, member_id: i64) -> Result<Vec<Course>, DomainError> {
        let enrollment = self.enrollment.lock().map_err(|_| lock_err())?;
        let ids: Vec<i64> = enrollment
            .iter()
            .filter(|(_, members)| members.contains(&member_id))
            .map(|(course_id, _)| *course_id)
            .collect();
        drop(enrollment);

        let courses = self.courses.lock().map_err(|_| lock_err())?;
        Ok(courses
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn member_ids(&self, course_id: i64) -> Result<Vec<i64>, DomainError> {
        let enrollment = self.enrollment.lock().map_err(|_| lock_err())?;
        Ok(enrollment.get(&course_id).cloned().unwrap_or_default())
    }

    async fn set_members(&self, course_id: i64, member_ids: &[i64]) -> Result<(), DomainError> {
        let mut enrollment = self.enrollment.lock().map_err(|_| lock_err())?;
        enrollment.insert(course_id, member_ids.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCourseDateRepository {
    dates: Mutex<Vec<CourseDate>>,
    next_id: AtomicI64,
}

impl InMemoryCourseDateRepository {
    pub fn new() -> Self {
        Self {
            dates: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl CourseDateRepository for InMemoryCourseDateRepository {
    async fn get(&self, id: i64) -> Result<Option<CourseDate>, DomainError> {
        let dates = self.dates.lock().map_err(|_| lock_err())?;
        Ok(dates.iter().find(|d| d.id == id).cloned())
    }

    async fn create(&self, date: CourseDate) -> Result<CourseDate, DomainError> {
        let mut dates = self.dates.lock().map_err(|_| lock_err())?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = CourseDate { id, ..date };
        dates.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut dates = self.dates.lock().map_err(|_| lock_err())?;
        let before = dates.len();
        dates.retain(|d| d.id != id);
        Ok(dates.len() < before)
    }

    async fn list_for_course(&self, course_id: i64) -> Result<Vec<CourseDate>, DomainError> {
        let dates = self.dates.lock().map_err(|_| lock_err())?;
        let mut result: Vec<CourseDate> = dates
            .iter()
            .filter(|d| d.course_id == course_id)
            .cloned()
            .collect();
        result.sort_by_key(|d| d.starts_at);
        Ok(result)
    }

    async fn delete_for_course(&self, course_id: i64) -> Result<u64, DomainError> {
        let mut dates = self.dates.lock().map_err(|_| lock_err())?;
        let before = dates.len();
        dates.retain(|d| d.course_id != course_id);
        Ok((before - dates.len()) as u64)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn get(&self, id: i64) -> Result<Option<Link>, DomainError> {
        let links = self.links.lock().map_err(|_| lock_err())?;
        Ok(links.iter().find(|l| l.id == id).cloned())
    }

    async fn create(&self, link: Link) -> Result<Link, DomainError> {
        let mut links = self.links.lock().map_err(|_| lock_err())?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Link { id, ..link };
        links.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut links = self.links.lock().map_err(|_| lock_err())?;
        let before = links.len();
        links.retain(|l| l.id != id);
        Ok(links.len() < before)
    }

    async fn list_for_provider(&self, provider_id: i64) -> Result<Vec<Link>, DomainError> {
        let links = self.links.lock().map_err(|_| lock_err())?;
        Ok(links
            .iter()
            .filter(|l| l.provider_id == provider_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryImageRepository {
    images: Mutex<Vec<Image>>,
    next_id: AtomicI64,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self {
            images: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn get(&self, id: i64) -> Result<Option<Image>, DomainError> {
        let images = self.images.lock().map_err(|_| lock_err())?;
        Ok(images.iter().find(|i| i.id == id).cloned())
    }

    async fn create(&self, image: Image) -> Result<Image, DomainError> {
        let mut images = self.images.lock().map_err(|_| lock_err())?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Image { id, ..image };
        images.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut images = self.images.lock().map_err(|_| lock_err())?;
        let before = images.len();
        images.retain(|i| i.id != id);
        Ok(images.len() < before)
    }

    async fn list_for_owner(&self, owner: ImageOwner) -> Result<Vec<Image>, DomainError> {
        let images = self.images.lock().map_err(|_| lock_err())?;
        Ok(images.iter().filter(|i| i.owner == owner).cloned().collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<AuthToken>>,
    next_id: AtomicI64,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn count(&self) -> usize {
        self.tokens.lock().map(|t| t.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn get_by_token(
        &self,
        principal_type: PrincipalType,
        token: &str,
    ) -> Result<Option<AuthToken>, DomainError> {
        let tokens = self.tokens.lock().map_err(|_| lock_err())?;
        Ok(tokens
            .iter()
            .find(|t| t.principal_type == principal_type && t.token == token)
            .cloned())
    }

    async fn create(&self, token: AuthToken) -> Result<AuthToken, DomainError> {
        let mut tokens = self.tokens.lock().map_err(|_| lock_err())?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = AuthToken { id, ..token };
        tokens.push(stored.clone());
        Ok(stored)
    }

    async fn delete_by_token(
        &self,
        principal_type: PrincipalType,
        token: &str,
    ) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.lock().map_err(|_| lock_err())?;
        let before = tokens.len();
        tokens.retain(|t| !(t.principal_type == principal_type && t.token == token));
        Ok(tokens.len() < before)
    }

    async fn delete_for_principal(
        &self,
        principal_type: PrincipalType,
        principal_id: i64,
    ) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.lock().map_err(|_| lock_err())?;
        let before = tokens.len();
        tokens.retain(|t| !(t.principal_type == principal_type && t.principal_id == principal_id));
        Ok((before - tokens.len()) as u64)
    }
}
