use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::validation;

/// An external link shown on a provider profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: i64,
    pub link_text: String,
    pub url: String,
    #[serde(skip_serializing)]
    pub provider_id: i64,
}

impl Link {
    pub fn new(provider_id: i64, link_text: String, url: String) -> Result<Self, DomainError> {
        validation::require_text("linkText", &link_text, 50)?;
        validation::validate_url("url", &url)?;

        Ok(Self {
            id: 0,
            link_text,
            url,
            provider_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_url() {
        assert!(Link::new(1, "Homepage".to_string(), "example.com".to_string()).is_err());
    }

    #[test]
    fn test_accepts_https_url() {
        let link = Link::new(1, "Homepage".to_string(), "https://example.com".to_string()).unwrap();
        assert_eq!(link.provider_id, 1);
    }
}
