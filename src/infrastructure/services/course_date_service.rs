use std::sync::Arc;

use crate::domain::course_date::{CourseDate, CourseDateRepository};
use crate::domain::DomainError;

/// Read access to individual course dates.
#[derive(Debug, Clone)]
pub struct CourseDateService {
    dates: Arc<dyn CourseDateRepository>,
}

impl CourseDateService {
    pub fn new(dates: Arc<dyn CourseDateRepository>) -> Self {
        Self { dates }
    }

    pub async fn find(&self, id: i64) -> Result<CourseDate, DomainError> {
        self.dates
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Course date '{}' not found", id)))
    }

    pub async fn list_for_course(&self, course_id: i64) -> Result<Vec<CourseDate>, DomainError> {
        self.dates.list_for_course(course_id).await
    }
}
