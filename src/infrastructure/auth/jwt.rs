//! JWT signing and verification for member and provider principals

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::principal::PrincipalType;

/// Claims carried by every access, refresh and reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Principal id
    pub sub: i64,
    pub email: String,
    /// Which table the principal lives in
    pub ptype: PrincipalType,
    pub iat: i64,
    pub exp: i64,
    /// Token id. `iat`/`exp` have second resolution, so two tokens for the
    /// same principal signed in the same second would otherwise be identical.
    pub jti: Uuid,
}

/// Signing/verification boundary for JWTs.
pub trait TokenSigner: Send + Sync + fmt::Debug {
    fn sign(
        &self,
        principal_id: i64,
        email: &str,
        ptype: PrincipalType,
        ttl_secs: i64,
    ) -> Result<String, DomainError>;

    fn verify(&self, token: &str) -> Result<AccessClaims, DomainError>;

    /// Verification that accepts an expired token. Used by the rotation and
    /// logout endpoints, where the bearer access token may already be stale.
    fn verify_ignoring_expiry(&self, token: &str) -> Result<AccessClaims, DomainError>;
}

/// JWT signer backed by `jsonwebtoken`. RS256 with PEM key files in
/// production; HS256 with a shared secret for development and tests.
pub struct JwtSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSigner")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl JwtSigner {
    pub fn hs256(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn rs256(private_key_pem: &[u8], public_key_pem: &[u8]) -> Result<Self, DomainError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| DomainError::configuration(format!("Invalid RSA private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| DomainError::configuration(format!("Invalid RSA public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: Algorithm::RS256,
        })
    }

    fn decode_with(
        &self,
        token: &str,
        validation: &Validation,
    ) -> Result<AccessClaims, DomainError> {
        decode::<AccessClaims>(token, &self.decoding_key, validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::credential("The given token could not be verified"))
    }
}

impl TokenSigner for JwtSigner {
    fn sign(
        &self,
        principal_id: i64,
        email: &str,
        ptype: PrincipalType,
        ttl_secs: i64,
    ) -> Result<String, DomainError> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: principal_id,
            email: email.to_string(),
            ptype,
            iat: now,
            exp: now + ttl_secs,
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, DomainError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        self.decode_with(token, &validation)
    }

    fn verify_ignoring_expiry(&self, token: &str) -> Result<AccessClaims, DomainError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = false;
        self.decode_with(token, &validation)
    }
}
