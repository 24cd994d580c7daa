use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::validation;

/// A provider's street address (one per provider).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub zip: String,
    pub city: String,
    pub country: String,
    #[serde(skip_serializing)]
    pub provider_id: i64,
}

impl Address {
    pub fn new(
        provider_id: i64,
        street: String,
        zip: String,
        city: String,
        country: String,
    ) -> Result<Self, DomainError> {
        validation::require_text("street", &street, 100)?;
        validation::require_text("zip", &zip, 25)?;
        validation::require_text("city", &city, 35)?;
        validation::require_text("country", &country, 25)?;

        Ok(Self {
            id: 0,
            street,
            zip,
            city,
            country,
            provider_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_address() {
        let a = Address::new(
            7,
            "Main St 1".to_string(),
            "8000".to_string(),
            "Zurich".to_string(),
            "Switzerland".to_string(),
        )
        .unwrap();
        assert_eq!(a.provider_id, 7);
    }

    #[test]
    fn test_rejects_long_city() {
        let result = Address::new(
            7,
            "Main St 1".to_string(),
            "8000".to_string(),
            "x".repeat(36),
            "Switzerland".to_string(),
        );
        assert!(result.is_err());
    }
}
