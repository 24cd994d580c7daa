use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::validation;

/// A registered student account.
///
/// The password hash is kept out of every serialized representation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    id: i64,
    first_name: String,
    last_name: String,
    #[serde(skip_serializing)]
    password_hash: String,
    email: String,
    birthday: Option<NaiveDate>,
    #[serde(skip_serializing)]
    profile_image_id: Option<i64>,
}

impl Member {
    /// Build a new, not-yet-persisted member (id 0 until stored).
    pub fn new(
        first_name: String,
        last_name: String,
        password_hash: String,
        email: String,
        birthday: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        validation::require_text("firstName", &first_name, 25)?;
        validation::require_text("lastName", &last_name, 25)?;
        validation::validate_email(&email)?;

        Ok(Self {
            id: 0,
            first_name,
            last_name,
            password_hash,
            email,
            birthday,
            profile_image_id: None,
        })
    }

    /// Rebuild a member from stored column values. No validation; the row
    /// was validated when it was written.
    pub fn restore(
        id: i64,
        first_name: String,
        last_name: String,
        password_hash: String,
        email: String,
        birthday: Option<NaiveDate>,
        profile_image_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            password_hash,
            email,
            birthday,
            profile_image_id,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    pub fn profile_image_id(&self) -> Option<i64> {
        self.profile_image_id
    }

    pub fn set_first_name(&mut self, first_name: String) -> Result<(), DomainError> {
        validation::require_text("firstName", &first_name, 25)?;
        self.first_name = first_name;
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: String) -> Result<(), DomainError> {
        validation::require_text("lastName", &last_name, 25)?;
        self.last_name = last_name;
        Ok(())
    }

    pub fn set_email(&mut self, email: String) -> Result<(), DomainError> {
        validation::validate_email(&email)?;
        self.email = email;
        Ok(())
    }

    pub fn set_birthday(&mut self, birthday: Option<NaiveDate>) {
        self.birthday = birthday;
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }

    pub fn set_profile_image_id(&mut self, image_id: Option<i64>) {
        self.profile_image_id = image_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member::new(
            "Anna".to_string(),
            "Muster".to_string(),
            "$argon2$hash".to_string(),
            "anna@example.com".to_string(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_new_member() {
        let m = member();
        assert_eq!(m.id(), 0);
        assert_eq!(m.first_name(), "Anna");
        assert_eq!(m.email(), "anna@example.com");
        assert!(m.birthday().is_none());
        assert!(m.profile_image_id().is_none());
    }

    #[test]
    fn test_rejects_long_first_name() {
        let result = Member::new(
            "x".repeat(26),
            "Muster".to_string(),
            "hash".to_string(),
            "anna@example.com".to_string(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_invalid_email() {
        let result = Member::new(
            "Anna".to_string(),
            "Muster".to_string(),
            "hash".to_string(),
            "nope".to_string(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_set_email_validates() {
        let mut m = member();
        assert!(m.set_email("still-not-an-email".to_string()).is_err());
        assert!(m.set_email("new@example.com".to_string()).is_ok());
        assert_eq!(m.email(), "new@example.com");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(member()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "Anna");
    }
}
