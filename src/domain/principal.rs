use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// The two kinds of authenticated account. Every token, claim and guard
/// carries one of these so member and provider credentials never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalType {
    Member,
    Provider,
}

impl PrincipalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Provider => "provider",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "member" => Ok(Self::Member),
            "provider" => Ok(Self::Provider),
            other => Err(DomainError::validation(format!(
                "Unknown principal type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
