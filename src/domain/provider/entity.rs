use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::validation;

/// An organization offering courses on the platform.
///
/// Providers start out unpublished; only published providers show up in the
/// public listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    id: i64,
    name: String,
    email: String,
    #[serde(skip_serializing)]
    password_hash: String,
    description: String,
    price: Decimal,
    contact_person: String,
    phone_number: Option<String>,
    category: String,
    needs_approval: bool,
    is_published: bool,
    #[serde(skip_serializing)]
    profile_image_id: Option<i64>,
}

impl Provider {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        description: String,
        price: Decimal,
        contact_person: String,
        phone_number: Option<String>,
        category: String,
    ) -> Result<Self, DomainError> {
        validation::require_text("name", &name, 50)?;
        validation::validate_email(&email)?;
        validation::validate_price(price)?;
        validation::require_text("contactPerson", &contact_person, 25)?;
        validation::optional_text("phoneNumber", phone_number.as_deref(), 25)?;
        validation::require_text("category", &category, 25)?;

        Ok(Self {
            id: 0,
            name,
            email,
            password_hash,
            description,
            price,
            contact_person,
            phone_number,
            category,
            needs_approval: false,
            is_published: false,
            profile_image_id: None,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: i64,
        name: String,
        email: String,
        password_hash: String,
        description: String,
        price: Decimal,
        contact_person: String,
        phone_number: Option<String>,
        category: String,
        needs_approval: bool,
        is_published: bool,
        profile_image_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            description,
            price,
            contact_person,
            phone_number,
            category,
            needs_approval,
            is_published,
            profile_image_id,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn contact_person(&self) -> &str {
        &self.contact_person
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn needs_approval(&self) -> bool {
        self.needs_approval
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn profile_image_id(&self) -> Option<i64> {
        self.profile_image_id
    }

    pub fn set_name(&mut self, name: String) -> Result<(), DomainError> {
        validation::require_text("name", &name, 50)?;
        self.name = name;
        Ok(())
    }

    pub fn set_email(&mut self, email: String) -> Result<(), DomainError> {
        validation::validate_email(&email)?;
        self.email = email;
        Ok(())
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }

    pub fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub fn set_price(&mut self, price: Decimal) -> Result<(), DomainError> {
        validation::validate_price(price)?;
        self.price = price;
        Ok(())
    }

    pub fn set_contact_person(&mut self, contact_person: String) -> Result<(), DomainError> {
        validation::require_text("contactPerson", &contact_person, 25)?;
        self.contact_person = contact_person;
        Ok(())
    }

    pub fn set_phone_number(&mut self, phone_number: Option<String>) -> Result<(), DomainError> {
        validation::optional_text("phoneNumber", phone_number.as_deref(), 25)?;
        self.phone_number = phone_number;
        Ok(())
    }

    pub fn set_category(&mut self, category: String) -> Result<(), DomainError> {
        validation::require_text("category", &category, 25)?;
        self.category = category;
        Ok(())
    }

    pub fn set_needs_approval(&mut self, needs_approval: bool) {
        self.needs_approval = needs_approval;
    }

    pub fn set_is_published(&mut self, is_published: bool) {
        self.is_published = is_published;
    }

    pub fn set_profile_image_id(&mut self, image_id: Option<i64>) {
        self.profile_image_id = image_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> Provider {
        Provider::new(
            "Yoga Studio".to_string(),
            "studio@example.com".to_string(),
            "$argon2$hash".to_string(),
            "Yoga for everyone".to_string(),
            Decimal::new(2990, 2),
            "Lena".to_string(),
            None,
            "Sports".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_provider_is_unpublished() {
        let p = provider();
        assert!(!p.is_published());
        assert!(!p.needs_approval());
        assert_eq!(p.price(), Decimal::new(2990, 2));
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut p = provider();
        assert!(p.set_price(Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn test_rejects_long_category() {
        let mut p = provider();
        assert!(p.set_category("x".repeat(26)).is_err());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(provider()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["contactPerson"], "Lena");
        assert_eq!(json["isPublished"], false);
    }
}
