//! Member profile endpoints
//!
//! All routes operate on the authenticated member's own account; a path id
//! naming anyone else fails the guard.

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireMember;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SuccessMessage};
use crate::api::upload::read_image_upload;
use crate::domain::{Course, Image, Member, Provider};
use crate::infrastructure::services::{UpdateMemberRequest, GUARD_FAILED};

pub fn create_members_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile))
        .route("/{id}", patch(update_member).delete(delete_member))
        .route(
            "/{id}/image",
            post(upload_image).patch(upload_image).delete(delete_image),
        )
}

/// Member with its eager relations, as the frontend consumes it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    #[serde(flatten)]
    pub member: Member,
    pub providers: Vec<Provider>,
    pub courses: Vec<Course>,
    pub profile_image: Option<Image>,
}

/// PATCH body; `id` must echo the path, `password` is not changeable here
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberBody {
    pub id: Option<i64>,
    pub password: Option<String>,
    #[serde(flatten)]
    pub update: UpdateMemberRequest,
}

/// GET /api/members/me
pub async fn get_profile(
    State(state): State<AppState>,
    RequireMember(member): RequireMember,
) -> Result<Json<MemberProfile>, ApiError> {
    let providers = state.provider_service.list_for_member(member.id()).await?;
    let courses = state.course_service.list_for_member(member.id()).await?;
    let profile_image = state.member_service.profile_image(&member).await?;

    Ok(Json(MemberProfile {
        member,
        providers,
        courses,
        profile_image,
    }))
}

/// PATCH /api/members/{id}
pub async fn update_member(
    State(state): State<AppState>,
    RequireMember(member): RequireMember,
    Path(id): Path<i64>,
    Json(body): Json<UpdateMemberBody>,
) -> Result<Json<Member>, ApiError> {
    if body.password.is_some() {
        return Err(ApiError::bad_request("Malformed request"));
    }
    if member.id() != id || body.id != Some(id) {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    let updated = state.member_service.update(id, body.update).await?;
    Ok(Json(updated))
}

/// DELETE /api/members/{id}
pub async fn delete_member(
    State(state): State<AppState>,
    RequireMember(member): RequireMember,
    Path(id): Path<i64>,
) -> Result<SuccessMessage, ApiError> {
    if member.id() != id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    state.member_service.delete(id).await?;
    Ok(SuccessMessage::ok("Profile got deleted successfully"))
}

/// POST|PATCH /api/members/{id}/image
pub async fn upload_image(
    State(state): State<AppState>,
    RequireMember(member): RequireMember,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Image>, ApiError> {
    if member.id() != id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    let file = read_image_upload(multipart).await?;
    let image = state.member_service.upload_profile_image(id, &file).await?;
    Ok(Json(image))
}

/// DELETE /api/members/{id}/image
pub async fn delete_image(
    State(state): State<AppState>,
    RequireMember(member): RequireMember,
    Path(id): Path<i64>,
) -> Result<SuccessMessage, ApiError> {
    if member.id() != id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    state.member_service.delete_profile_image(id).await?;
    Ok(SuccessMessage::ok("Image got deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_flattens_profile_fields() {
        let body = serde_json::json!({
            "id": 7,
            "firstName": "Anna",
            "email": "anna@example.com"
        });

        let parsed: UpdateMemberBody = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.id, Some(7));
        assert!(parsed.password.is_none());
        assert_eq!(parsed.update.first_name.as_deref(), Some("Anna"));
        assert_eq!(parsed.update.email.as_deref(), Some("anna@example.com"));
    }

    #[test]
    fn test_update_body_carries_password_for_rejection() {
        let body = serde_json::json!({ "id": 7, "password": "sneaky" });

        let parsed: UpdateMemberBody = serde_json::from_value(body).unwrap();
        assert!(parsed.password.is_some());
    }
}
