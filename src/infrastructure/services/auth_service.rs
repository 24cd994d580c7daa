use std::sync::Arc;

use crate::domain::principal::PrincipalType;
use crate::domain::DomainError;
use crate::infrastructure::auth::{PasswordHasher, TokenSigner};
use crate::infrastructure::mail::{MailMessage, Mailer};
use crate::infrastructure::services::member_service::MemberService;
use crate::infrastructure::services::provider_service::ProviderService;
use crate::infrastructure::services::token_service::TokenService;

pub const LOGIN_FAILED: &str = "This email, password combination was not found";
pub const GUARD_FAILED: &str =
    "Unauthorized: Malformed request or missing access permission rights";

/// A freshly issued access/refresh token pair. The refresh token is already
/// persisted when this is returned.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

struct PrincipalRecord {
    id: i64,
    email: String,
    password_hash: String,
}

/// Login, token rotation, logout and the password-reset flow for both
/// principal types.
#[derive(Debug, Clone)]
pub struct AuthService {
    members: Arc<MemberService>,
    providers: Arc<ProviderService>,
    tokens: Arc<TokenService>,
    signer: Arc<dyn TokenSigner>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn Mailer>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    frontend_url: String,
}

impl AuthService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        members: Arc<MemberService>,
        providers: Arc<ProviderService>,
        tokens: Arc<TokenService>,
        signer: Arc<dyn TokenSigner>,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn Mailer>,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
        frontend_url: String,
    ) -> Self {
        Self {
            members,
            providers,
            tokens,
            signer,
            hasher,
            mailer,
            access_ttl_secs,
            refresh_ttl_secs,
            frontend_url,
        }
    }

    async fn lookup(
        &self,
        ptype: PrincipalType,
        email: &str,
    ) -> Result<Option<PrincipalRecord>, DomainError> {
        match ptype {
            PrincipalType::Member => Ok(self.members.find_by_email(email).await?.map(|m| {
                PrincipalRecord {
                    id: m.id(),
                    email: m.email().to_string(),
                    password_hash: m.password_hash().to_string(),
                }
            })),
            PrincipalType::Provider => Ok(self.providers.find_by_email(email).await?.map(|p| {
                PrincipalRecord {
                    id: p.id(),
                    email: p.email().to_string(),
                    password_hash: p.password_hash().to_string(),
                }
            })),
        }
    }

    async fn set_password(
        &self,
        ptype: PrincipalType,
        id: i64,
        new_password: &str,
    ) -> Result<(), DomainError> {
        match ptype {
            PrincipalType::Member => self.members.update_password(id, new_password).await,
            PrincipalType::Provider => self.providers.update_password(id, new_password).await,
        }
    }

    /// Sign a new access/refresh pair and persist the refresh token.
    async fn issue_pair(
        &self,
        id: i64,
        email: &str,
        ptype: PrincipalType,
    ) -> Result<TokenPair, DomainError> {
        let access_token = self.signer.sign(id, email, ptype, self.access_ttl_secs)?;
        let refresh_token = self.signer.sign(id, email, ptype, self.refresh_ttl_secs)?;

        self.tokens
            .store(ptype, id, refresh_token.clone(), self.refresh_ttl_secs)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub async fn login(
        &self,
        ptype: PrincipalType,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, DomainError> {
        let record = self
            .lookup(ptype, email)
            .await?
            .ok_or_else(|| DomainError::credential(LOGIN_FAILED))?;

        if !self.hasher.verify(password, &record.password_hash)? {
            return Err(DomainError::credential(LOGIN_FAILED));
        }

        self.issue_pair(record.id, &record.email, ptype).await
    }

    /// Rotate a refresh token. The access token may be expired; it only
    /// names the principal. The stored refresh row is replaced by a new one.
    pub async fn rotate(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, DomainError> {
        let claims = self.signer.verify_ignoring_expiry(access_token)?;

        let stored = self
            .tokens
            .retrieve_valid(claims.ptype, refresh_token)
            .await?;
        self.tokens.delete(claims.ptype, refresh_token).await?;

        self.issue_pair(stored.principal_id, &claims.email, claims.ptype)
            .await
    }

    pub async fn logout(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), DomainError> {
        let claims = self.signer.verify_ignoring_expiry(access_token)?;
        self.tokens.delete(claims.ptype, refresh_token).await
    }

    /// Create a reset token (access-token lifetime) and mail the reset link.
    pub async fn forgot_password(
        &self,
        ptype: PrincipalType,
        email: &str,
    ) -> Result<(), DomainError> {
        let record = self
            .lookup(ptype, email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        let token = self
            .signer
            .sign(record.id, &record.email, ptype, self.access_ttl_secs)?;
        self.tokens
            .store(ptype, record.id, token.clone(), self.access_ttl_secs)
            .await?;

        let link = format!(
            "{}/reset-password?token={}",
            self.frontend_url.trim_end_matches('/'),
            token
        );
        let message = MailMessage {
            to: record.email,
            subject: "Forgotten Password".to_string(),
            html: format!(
                "Hi! <br><br> If you requested to reset your password<br><br>\
                 <a href=\"{}\">Click here</a>",
                link
            ),
        };

        self.mailer.send(&message).await
    }

    /// Logged-in password change: the bearer token must belong to the account
    /// being changed, the current password must check out and the new one
    /// must differ.
    pub async fn change_password(
        &self,
        bearer_token: &str,
        ptype: PrincipalType,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let record = self
            .lookup(ptype, email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        if !self.hasher.verify(current_password, &record.password_hash)? {
            return Err(DomainError::validation("Wrong current password"));
        }
        if self.hasher.verify(new_password, &record.password_hash)? {
            return Err(DomainError::validation("New password cannot be old password"));
        }

        let claims = self.signer.verify(bearer_token)?;
        if claims.email != email || claims.ptype != ptype {
            return Err(DomainError::credential(GUARD_FAILED));
        }

        self.set_password(ptype, record.id, new_password).await
    }

    /// Token-based reset: the emailed token row must still be valid, its
    /// embedded claims must match the request, the new password must differ
    /// from the current one, and the row is consumed.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        ptype: PrincipalType,
        email: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let stored = self.tokens.retrieve_valid(ptype, reset_token).await?;

        let claims = self.signer.verify(&stored.token)?;
        if claims.email != email || claims.ptype != ptype {
            return Err(DomainError::validation(
                "Malformed request body: Email does not match",
            ));
        }

        let record = self
            .lookup(ptype, email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        if self.hasher.verify(new_password, &record.password_hash)? {
            return Err(DomainError::validation("New password cannot be old password"));
        }

        self.set_password(ptype, stored.principal_id, new_password)
            .await?;
        self.tokens.delete(ptype, reset_token).await
    }
}
