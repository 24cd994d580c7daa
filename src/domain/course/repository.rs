use async_trait::async_trait;

use crate::domain::course::Course;
use crate::domain::error::DomainError;

#[async_trait]
pub trait CourseRepository: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: i64) -> Result<Option<Course>, DomainError>;

    async fn create(&self, course: Course) -> Result<Course, DomainError>;

    async fn update(&self, course: &Course) -> Result<(), DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Courses whose own `is_published` flag is set AND whose provider is
    /// published.
    async fn list_published(&self) -> Result<Vec<Course>, DomainError>;

    async fn list_for_provider(&self, provider_id: i64) -> Result<Vec<Course>, DomainError>;

    /// Courses a member is enrolled in.
    async fn list_for_member(&self, member_id: i64) -> Result<Vec<Course>, DomainError>;

    /// Ids of the members enrolled in a course.
    async fn member_ids(&self, course_id: i64) -> Result<Vec<i64>, DomainError>;

    /// Replace the course's enrollment with the given member ids.
    async fn set_members(&self, course_id: i64, member_ids: &[i64]) -> Result<(), DomainError>;
}
