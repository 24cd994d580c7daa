//! Authentication endpoints
//!
//! Login, registration, refresh-token rotation, logout and the
//! password-reset flow for members and providers.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::{bearer_token, refresh_cookie};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SuccessMessage};
use crate::domain::PrincipalType;
use crate::infrastructure::services::{CreateMemberRequest, CreateProviderRequest, TokenPair};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/access_token", get(rotate_token))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,
}

/// Registration body, dispatched on its `type` field
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegisterRequest {
    Member(CreateMemberRequest),
    Provider(CreateProviderRequest),
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,
}

/// Body shared by the logged-in password change and the token reset
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
    pub current_password: Option<String>,
    pub new_password_token: Option<String>,
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// The refresh token travels in an HttpOnly cookie, the access token in
/// the response body.
fn token_response(pair: TokenPair) -> Response {
    let cookie = format!("refreshToken={}; HttpOnly", pair.refresh_token);

    (
        [(header::SET_COOKIE, cookie)],
        Json(AccessTokenResponse {
            access_token: pair.access_token,
        }),
    )
        .into_response()
}

/// Login with email, password and principal type
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let pair = state
        .auth_service
        .login(request.principal_type, &request.email, &request.password)
        .await?;

    Ok(token_response(pair))
}

/// Register a member or provider account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<SuccessMessage, ApiError> {
    match request {
        RegisterRequest::Member(body) => {
            body.validate()
                .map_err(|e| ApiError::bad_request(format!("Malformed request body: {}", e)))?;
            state.member_service.create(body).await?;
        }
        RegisterRequest::Provider(body) => {
            body.validate()
                .map_err(|e| ApiError::bad_request(format!("Malformed request body: {}", e)))?;
            state.provider_service.create(body).await?;
        }
    }

    Ok(SuccessMessage::created(
        "User has been registered successfully",
    ))
}

/// Exchange an expired access token plus the refresh cookie for a new pair
///
/// GET /auth/access_token
pub async fn rotate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let access_token = bearer_token(&headers)?;
    let refresh_token = refresh_cookie(&headers)
        .ok_or_else(|| ApiError::not_found("No refresh token has been provided"))?;

    let pair = state
        .auth_service
        .rotate(&access_token, &refresh_token)
        .await?;

    Ok(token_response(pair))
}

/// Delete the refresh row named by the cookie
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<SuccessMessage, ApiError> {
    let refresh_token = refresh_cookie(&headers)
        .ok_or_else(|| ApiError::bad_request("No refresh token has been provided"))?;
    let access_token = bearer_token(&headers)?;

    state
        .auth_service
        .logout(&access_token, &refresh_token)
        .await?;

    Ok(SuccessMessage::ok("User got logged out successfully"))
}

/// Mail a reset link carrying a short-lived reset token
///
/// POST /auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<SuccessMessage, ApiError> {
    state
        .auth_service
        .forgot_password(request.principal_type, &request.email)
        .await?;

    Ok(SuccessMessage::ok("Email sent successfully"))
}

/// Change the password, either logged-in (currentPassword) or via the
/// emailed reset token (newPasswordToken)
///
/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<SuccessMessage, ApiError> {
    if let Some(current_password) = &request.current_password {
        let access_token = bearer_token(&headers)?;
        state
            .auth_service
            .change_password(
                &access_token,
                request.principal_type,
                &request.email,
                current_password,
                &request.new_password,
            )
            .await?;
    } else if let Some(reset_token) = &request.new_password_token {
        state
            .auth_service
            .reset_password(
                reset_token,
                request.principal_type,
                &request.email,
                &request.new_password,
            )
            .await?;
    } else {
        return Err(ApiError::bad_request(
            "Password could not be changed. Malformed request body",
        ));
    }

    Ok(SuccessMessage::ok("Password got updated successfully"))
}
