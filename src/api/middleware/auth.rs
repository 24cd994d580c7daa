//! Bearer-token guards for member and provider routes

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{Member, PrincipalType, Provider};
use crate::infrastructure::services::GUARD_FAILED;

const REFRESH_COOKIE: &str = "refreshToken";

/// Extractor that requires a valid member access token
///
/// The token comes from the `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone)]
pub struct RequireMember(pub Member);

/// Extractor that requires a valid provider access token
#[derive(Debug, Clone)]
pub struct RequireProvider(pub Provider);

impl FromRequestParts<AppState> for RequireMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        debug!("Validating member access token");

        let claims = state
            .token_signer
            .verify(&token)
            .map_err(|_| ApiError::unauthorized(GUARD_FAILED))?;
        if claims.ptype != PrincipalType::Member {
            return Err(ApiError::unauthorized(GUARD_FAILED));
        }

        let member = state
            .member_service
            .find(claims.sub)
            .await
            .map_err(|_| ApiError::unauthorized(GUARD_FAILED))?;

        Ok(RequireMember(member))
    }
}

impl FromRequestParts<AppState> for RequireProvider {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        debug!("Validating provider access token");

        let claims = state
            .token_signer
            .verify(&token)
            .map_err(|_| ApiError::unauthorized(GUARD_FAILED))?;
        if claims.ptype != PrincipalType::Provider {
            return Err(ApiError::unauthorized(GUARD_FAILED));
        }

        let provider = state
            .provider_service
            .find(claims.sub)
            .await
            .map_err(|_| ApiError::unauthorized(GUARD_FAILED))?;

        Ok(RequireProvider(provider))
    }
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::not_found("No token has been provided"))
}

/// Read the refresh token from the `refreshToken` cookie, if present
pub fn refresh_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == REFRESH_COOKIE {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer eyJhbGciOiJIUzI1NiJ9.test".parse().unwrap(),
        );

        let result = bearer_token(&headers);
        assert_eq!(result.unwrap(), "eyJhbGciOiJIUzI1NiJ9.test");
    }

    #[test]
    fn test_missing_token_is_not_found() {
        let headers = HeaderMap::new();

        let err = bearer_token(&headers).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.response.error.message, "No token has been provided");
    }

    #[test]
    fn test_invalid_auth_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn test_refresh_cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; refreshToken=abc.def.ghi; lang=de".parse().unwrap(),
        );

        assert_eq!(refresh_cookie(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_refresh_cookie_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark".parse().unwrap());

        assert_eq!(refresh_cookie(&headers), None);
        assert_eq!(refresh_cookie(&HeaderMap::new()), None);
    }
}
