use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::validation;

/// Who an uploaded image belongs to. Members have a single profile image;
/// providers and courses keep a slideshow out of which one image may be
/// marked as the profile image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOwner {
    Member(i64),
    Provider(i64),
    Course(i64),
}

impl ImageOwner {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Member(_) => "member",
            Self::Provider(_) => "provider",
            Self::Course(_) => "course",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Member(id) | Self::Provider(id) | Self::Course(id) => *id,
        }
    }

    pub fn from_parts(kind: &str, id: i64) -> Result<Self, DomainError> {
        match kind {
            "member" => Ok(Self::Member(id)),
            "provider" => Ok(Self::Provider(id)),
            "course" => Ok(Self::Course(id)),
            other => Err(DomainError::internal(format!(
                "Unknown image owner type: {}",
                other
            ))),
        }
    }
}

/// A stored image: public URL plus the object-storage key needed to delete
/// it again. The key never leaves the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: i64,
    pub url: String,
    #[serde(skip_serializing)]
    pub key: String,
    #[serde(skip_serializing)]
    pub owner: ImageOwner,
}

impl Image {
    pub fn new(owner: ImageOwner, url: String, key: String) -> Result<Self, DomainError> {
        validation::validate_url("url", &url)?;

        Ok(Self {
            id: 0,
            url,
            key,
            owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_round_trips() {
        let owner = ImageOwner::Course(9);
        assert_eq!(
            ImageOwner::from_parts(owner.kind(), owner.id()).unwrap(),
            owner
        );
    }

    #[test]
    fn test_key_never_serialized() {
        let image = Image::new(
            ImageOwner::Member(1),
            "https://cdn.example.com/member/abc1.png".to_string(),
            "member/abc1.png".to_string(),
        )
        .unwrap();
        let json = serde_json::to_value(image).unwrap();
        assert!(json.get("key").is_none());
        assert!(json.get("owner").is_none());
        assert!(json["url"].as_str().unwrap().starts_with("https://"));
    }
}
