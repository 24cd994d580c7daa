use async_trait::async_trait;

use crate::domain::course_date::CourseDate;
use crate::domain::error::DomainError;

#[async_trait]
pub trait CourseDateRepository: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: i64) -> Result<Option<CourseDate>, DomainError>;

    async fn create(&self, date: CourseDate) -> Result<CourseDate, DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    async fn list_for_course(&self, course_id: i64) -> Result<Vec<CourseDate>, DomainError>;

    /// Remove every date belonging to a course.
    async fn delete_for_course(&self, course_id: i64) -> Result<u64, DomainError>;
}
