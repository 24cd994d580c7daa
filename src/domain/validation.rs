//! Field validation helpers shared by the entity constructors.

use rust_decimal::Decimal;

use crate::domain::error::DomainError;

/// Require a non-empty string no longer than `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!(
            "{} must not be empty",
            field
        )));
    }
    max_len(field, value, max)
}

/// Length check for optional fields; `None` always passes.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<(), DomainError> {
    match value {
        Some(v) => max_len(field, v, max),
        None => Ok(()),
    }
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    max_len("email", email, 65)?;

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(DomainError::validation(format!(
            "Email address '{}' is invalid",
            email
        )));
    }

    Ok(())
}

pub fn validate_url(field: &str, url: &str) -> Result<(), DomainError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(DomainError::validation(format!(
            "{} must be a valid http(s) URL",
            field
        )));
    }
    Ok(())
}

pub fn validate_price(price: Decimal) -> Result<(), DomainError> {
    if price.is_sign_negative() {
        return Err(DomainError::validation("price must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_empty() {
        assert!(require_text("firstName", "   ", 25).is_err());
        assert!(require_text("firstName", "Anna", 25).is_ok());
    }

    #[test]
    fn test_max_len_counts_characters() {
        assert!(max_len("name", &"x".repeat(50), 50).is_ok());
        assert!(max_len("name", &"x".repeat(51), 50).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("anna@example.com").is_ok());
        assert!(validate_email("anna@localhost").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email(&format!("{}@example.com", "x".repeat(70))).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("url", "https://example.com/a").is_ok());
        assert!(validate_url("url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::new(1990, 2)).is_ok());
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
    }
}
