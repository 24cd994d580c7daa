//! PostgreSQL repository implementations.

pub mod course;
pub mod course_date;
pub mod image;
pub mod link;
pub mod member;
pub mod provider;
pub mod token;

#[cfg(test)]
pub mod in_memory;

pub use course::PostgresCourseRepository;
pub use course_date::PostgresCourseDateRepository;
pub use image::PostgresImageRepository;
pub use link::PostgresLinkRepository;
pub use member::PostgresMemberRepository;
pub use provider::PostgresProviderRepository;
pub use token::PostgresTokenRepository;

use crate::domain::DomainError;

/// Map a sqlx error, turning unique-constraint violations into conflicts.
pub(crate) fn map_db_error(context: &str, error: sqlx::Error) -> DomainError {
    if let Some(db_error) = error.as_database_error() {
        if db_error.code().as_deref() == Some("23505") {
            return unique_violation(db_error.constraint());
        }
    }
    DomainError::storage(format!("{}: {}", context, error))
}

/// Conflict error for a 23505, keyed on the violated constraint. Only the
/// email columns of members and providers get the user-facing message.
pub(crate) fn unique_violation(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some(name) if name.ends_with("_email_key") => DomainError::conflict("Email already taken"),
        _ => DomainError::conflict("Duplicate record"),
    }
}

/// Error mapper for malformed rows, shared by the row-to-entity helpers.
pub(crate) fn row_error(entity: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::storage(format!("Invalid {} row: {}", entity, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_constraints_get_email_message() {
        for constraint in ["members_email_key", "providers_email_key"] {
            let err = unique_violation(Some(constraint));
            assert!(
                matches!(&err, DomainError::Conflict { message } if message == "Email already taken")
            );
        }
    }

    #[test]
    fn test_other_unique_violations_stay_generic() {
        for constraint in [Some("auth_tokens_token_key"), Some("addresses_provider_id_key"), None] {
            let err = unique_violation(constraint);
            assert!(
                matches!(&err, DomainError::Conflict { message } if message == "Duplicate record")
            );
        }
    }
}
