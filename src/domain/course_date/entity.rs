use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::validation;

/// A scheduled occurrence of a course, with its venue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDate {
    pub id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub street: String,
    pub zip: String,
    pub city: String,
    pub country: String,
    #[serde(skip_serializing)]
    pub course_id: i64,
}

impl CourseDate {
    pub fn new(
        course_id: i64,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        street: String,
        zip: String,
        city: String,
        country: String,
    ) -> Result<Self, DomainError> {
        if ends_at <= starts_at {
            return Err(DomainError::validation("endsAt must be after startsAt"));
        }
        validation::require_text("street", &street, 100)?;
        validation::require_text("zip", &zip, 25)?;
        validation::require_text("city", &city, 35)?;
        validation::require_text("country", &country, 25)?;

        Ok(Self {
            id: 0,
            starts_at,
            ends_at,
            street,
            zip,
            city,
            country,
            course_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_rejects_end_before_start() {
        let now = Utc::now();
        let result = CourseDate::new(
            1,
            now,
            now - Duration::hours(1),
            "Main St 1".to_string(),
            "8000".to_string(),
            "Zurich".to_string(),
            "Switzerland".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_accepts_valid_range() {
        let now = Utc::now();
        let date = CourseDate::new(
            1,
            now,
            now + Duration::hours(1),
            "Main St 1".to_string(),
            "8000".to_string(),
            "Zurich".to_string(),
            "Switzerland".to_string(),
        )
        .unwrap();
        assert_eq!(date.course_id, 1);
    }
}
