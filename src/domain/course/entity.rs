use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::validation;

/// A course offered by a provider.
///
/// Unlike the credential-bearing entities this one is a plain record; the
/// service re-runs [`Course::validate`] after applying updates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub instructor: Option<String>,
    pub phone_number: Option<String>,
    pub email: String,
    pub description: String,
    pub price: Decimal,
    pub max_participants: Option<i32>,
    pub category: String,
    pub difficulty: Option<String>,
    pub equipment: Option<String>,
    pub requirements: Option<String>,
    pub trial_day: bool,
    pub is_private: bool,
    pub is_published: bool,
    #[serde(skip_serializing)]
    pub provider_id: i64,
    #[serde(skip_serializing)]
    pub profile_image_id: Option<i64>,
}

impl Course {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider_id: i64,
        name: String,
        instructor: Option<String>,
        phone_number: Option<String>,
        email: String,
        description: String,
        price: Decimal,
        max_participants: Option<i32>,
        category: String,
        difficulty: Option<String>,
        equipment: Option<String>,
        requirements: Option<String>,
        trial_day: bool,
        is_private: bool,
    ) -> Result<Self, DomainError> {
        let course = Self {
            id: 0,
            name,
            instructor,
            phone_number,
            email,
            description,
            price,
            max_participants,
            category,
            difficulty,
            equipment,
            requirements,
            trial_day,
            is_private,
            is_published: false,
            provider_id,
            profile_image_id: None,
        };
        course.validate()?;
        Ok(course)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validation::require_text("name", &self.name, 50)?;
        validation::optional_text("instructor", self.instructor.as_deref(), 50)?;
        validation::optional_text("phoneNumber", self.phone_number.as_deref(), 25)?;
        validation::validate_email(&self.email)?;
        validation::validate_price(self.price)?;
        validation::require_text("category", &self.category, 25)?;
        validation::optional_text("difficulty", self.difficulty.as_deref(), 25)?;

        if let Some(max) = self.max_participants {
            if max < 1 {
                return Err(DomainError::validation(
                    "maxParticipants must be at least 1",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course::new(
            1,
            "Morning Yoga".to_string(),
            Some("Lena".to_string()),
            None,
            "yoga@example.com".to_string(),
            "Sun salutations".to_string(),
            Decimal::new(1500, 2),
            Some(12),
            "Sports".to_string(),
            Some("Beginner".to_string()),
            None,
            None,
            true,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_new_course_is_unpublished() {
        let c = course();
        assert!(!c.is_published);
        assert_eq!(c.provider_id, 1);
    }

    #[test]
    fn test_rejects_zero_max_participants() {
        let mut c = course();
        c.max_participants = Some(0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut c = course();
        c.price = Decimal::new(-1, 0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_provider_id_not_serialized() {
        let json = serde_json::to_value(course()).unwrap();
        assert!(json.get("providerId").is_none());
        assert_eq!(json["trialDay"], true);
    }
}
