//! Course endpoints
//!
//! The public catalogue shows courses whose course and provider are both
//! published. A course's owner may view and edit it regardless.

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{bearer_token, RequireProvider};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SuccessMessage};
use crate::api::upload::read_image_upload;
use crate::domain::{Course, CourseDate, Image, PrincipalType, Provider};
use crate::infrastructure::services::{CreateCourseRequest, UpdateCourseRequest, GUARD_FAILED};

pub fn create_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/{id}", get(get_course).patch(update_course).delete(delete_course))
        .route("/{id}/image", post(upload_image))
        .route(
            "/{id}/images/{imageid}",
            patch(set_profile_image).delete(delete_image),
        )
}

/// Course with its eager relations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub provider: Provider,
    pub course_dates: Vec<CourseDate>,
    pub profile_image: Option<Image>,
    pub slide_show: Vec<Image>,
}

/// PATCH body; `id` and `provider` must echo path and owner
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseBody {
    pub provider: Option<i64>,
    #[serde(flatten)]
    pub update: UpdateCourseRequest,
}

async fn course_detail(state: &AppState, course: Course) -> Result<CourseDetail, ApiError> {
    let provider = state.provider_service.find(course.provider_id).await?;
    let course_dates = state.course_service.dates(course.id).await?;
    let profile_image = state.course_service.profile_image(&course).await?;
    let slide_show = state.course_service.slideshow(course.id).await?;

    Ok(CourseDetail {
        course,
        provider,
        course_dates,
        profile_image,
        slide_show,
    })
}

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseDetail>>, ApiError> {
    let courses = state.course_service.list_published().await?;

    let mut details = Vec::with_capacity(courses.len());
    for course in courses {
        details.push(course_detail(&state, course).await?);
    }
    Ok(Json(details))
}

/// GET /api/courses/{id}
///
/// Published courses are public; the owning provider may also view an
/// unpublished one by presenting its access token.
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<CourseDetail>, ApiError> {
    let course = state.course_service.find(id).await?;
    let provider = state.provider_service.find(course.provider_id).await?;

    let visible = course.is_published && provider.is_published();
    let owner = match bearer_token(&headers) {
        Ok(token) => match state.token_signer.verify(&token) {
            Ok(claims) => {
                claims.ptype == PrincipalType::Provider && claims.sub == course.provider_id
            }
            Err(_) => false,
        },
        Err(_) => false,
    };

    if !visible && !owner {
        return Err(ApiError::unauthorized("Missing access permission rights"));
    }

    let detail = course_detail(&state, course).await?;
    Ok(Json(detail))
}

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Json(body): Json<CreateCourseRequest>,
) -> Result<Response, ApiError> {
    if body.provider != provider.id() {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    let course = state.course_service.create(body).await?;
    Ok((StatusCode::CREATED, Json(course)).into_response())
}

/// PATCH /api/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCourseBody>,
) -> Result<Json<Course>, ApiError> {
    let course = state.course_service.find(id).await?;

    if course.provider_id != provider.id()
        || body.update.id != Some(id)
        || body.provider != Some(course.provider_id)
    {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    let updated = state.course_service.update(id, body.update).await?;
    Ok(Json(updated))
}

/// DELETE /api/courses/{id}
pub async fn delete_course(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path(id): Path<i64>,
) -> Result<SuccessMessage, ApiError> {
    let course = state.course_service.find(id).await?;
    if course.provider_id != provider.id() {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    state.course_service.delete(id).await?;
    Ok(SuccessMessage::ok("Course profile got deleted successfully"))
}

/// POST /api/courses/{id}/image
pub async fn upload_image(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Image>, ApiError> {
    let course = state.course_service.find(id).await?;
    if course.provider_id != provider.id() {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    let file = read_image_upload(multipart).await?;
    let image = state.course_service.upload_slideshow_image(id, &file).await?;
    Ok(Json(image))
}

/// The course must belong to the provider and its slideshow must contain
/// the image named by the path.
async fn require_own_image(
    state: &AppState,
    provider_id: i64,
    course_id: i64,
    image_id: i64,
) -> Result<(), ApiError> {
    let course = state.course_service.find(course_id).await?;
    if course.provider_id != provider_id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    let slideshow = state.course_service.slideshow(course_id).await?;
    if !slideshow.iter().any(|image| image.id == image_id) {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }
    Ok(())
}

/// PATCH /api/courses/{id}/images/{imageid}
pub async fn set_profile_image(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path((id, image_id)): Path<(i64, i64)>,
) -> Result<Json<Image>, ApiError> {
    require_own_image(&state, provider.id(), id, image_id).await?;

    let image = state.course_service.set_profile_image(id, image_id).await?;
    Ok(Json(image))
}

/// DELETE /api/courses/{id}/images/{imageid}
pub async fn delete_image(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path((id, image_id)): Path<(i64, i64)>,
) -> Result<SuccessMessage, ApiError> {
    require_own_image(&state, provider.id(), id, image_id).await?;

    state.course_service.delete_image(id, image_id).await?;
    Ok(SuccessMessage::ok("Image got deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_requires_echoed_ids() {
        let body = serde_json::json!({
            "id": 5,
            "provider": 2,
            "name": "Morning Flow",
            "memberIds": [1, 4]
        });

        let parsed: UpdateCourseBody = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.provider, Some(2));
        assert_eq!(parsed.update.id, Some(5));
        assert_eq!(parsed.update.name.as_deref(), Some("Morning Flow"));
        assert_eq!(parsed.update.member_ids, Some(vec![1, 4]));
    }
}
