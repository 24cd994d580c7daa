//! Provider endpoints
//!
//! Public listing and detail views show published providers only and strip
//! unpublished courses; everything mutating is gated on self-ownership.

use axum::{
    extract::{Multipart, Path, State},
    routing::{delete, get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireProvider;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SuccessMessage};
use crate::api::upload::read_image_upload;
use crate::domain::{Address, Course, Image, Link, Provider};
use crate::infrastructure::services::{UpdateProviderRequest, GUARD_FAILED};

pub fn create_providers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_providers))
        .route("/me", get(get_profile))
        .route("/{id}", get(get_provider).patch(update_provider).delete(delete_provider))
        .route("/{id}/image", post(upload_image))
        .route(
            "/{id}/images/{imageid}",
            patch(set_profile_image).delete(delete_image),
        )
        .route("/{id}/links/{linkid}", delete(delete_link))
}

/// Provider with its eager relations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    #[serde(flatten)]
    pub provider: Provider,
    pub address: Option<Address>,
    pub links: Vec<Link>,
    pub courses: Vec<Course>,
    pub profile_image: Option<Image>,
    pub slide_show: Vec<Image>,
}

/// PATCH body; `id` must echo the path, `password` is not changeable here
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderBody {
    pub id: Option<i64>,
    pub password: Option<String>,
    #[serde(flatten)]
    pub update: UpdateProviderRequest,
}

/// Assemble the full provider view. Public views drop unpublished courses.
async fn provider_profile(
    state: &AppState,
    provider: Provider,
    public: bool,
) -> Result<ProviderProfile, ApiError> {
    let address = state.provider_service.address(provider.id()).await?;
    let links = state.provider_service.links(provider.id()).await?;
    let mut courses = state.course_service.list_for_provider(provider.id()).await?;
    if public {
        courses.retain(|course| course.is_published);
    }
    let profile_image = state.provider_service.profile_image(&provider).await?;
    let slide_show = state.provider_service.slideshow(provider.id()).await?;

    Ok(ProviderProfile {
        provider,
        address,
        links,
        courses,
        profile_image,
        slide_show,
    })
}

/// GET /api/providers
pub async fn list_providers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProviderProfile>>, ApiError> {
    let providers = state.provider_service.list_published().await?;

    let mut profiles = Vec::with_capacity(providers.len());
    for provider in providers {
        profiles.push(provider_profile(&state, provider, true).await?);
    }
    Ok(Json(profiles))
}

/// GET /api/providers/me
pub async fn get_profile(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
) -> Result<Json<ProviderProfile>, ApiError> {
    let profile = provider_profile(&state, provider, false).await?;
    Ok(Json(profile))
}

/// GET /api/providers/{id}
pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProviderProfile>, ApiError> {
    let provider = state.provider_service.find_published(id).await?;
    let profile = provider_profile(&state, provider, true).await?;
    Ok(Json(profile))
}

/// PATCH /api/providers/{id}
pub async fn update_provider(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProviderBody>,
) -> Result<Json<Provider>, ApiError> {
    if body.password.is_some() {
        return Err(ApiError::bad_request("Malformed request"));
    }
    if provider.id() != id || body.id != Some(id) {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    let updated = state.provider_service.update(id, body.update).await?;
    Ok(Json(updated))
}

/// DELETE /api/providers/{id}
pub async fn delete_provider(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path(id): Path<i64>,
) -> Result<SuccessMessage, ApiError> {
    if provider.id() != id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    state.provider_service.delete(id).await?;
    Ok(SuccessMessage::ok("Profile got deleted successfully"))
}

/// POST /api/providers/{id}/image
pub async fn upload_image(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Image>, ApiError> {
    if provider.id() != id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    let file = read_image_upload(multipart).await?;
    let image = state
        .provider_service
        .upload_slideshow_image(id, &file)
        .await?;
    Ok(Json(image))
}

/// The slideshow must contain the image named by the path.
async fn require_own_image(
    state: &AppState,
    provider_id: i64,
    image_id: i64,
) -> Result<(), ApiError> {
    let slideshow = state.provider_service.slideshow(provider_id).await?;
    if !slideshow.iter().any(|image| image.id == image_id) {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }
    Ok(())
}

/// PATCH /api/providers/{id}/images/{imageid}
pub async fn set_profile_image(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path((id, image_id)): Path<(i64, i64)>,
) -> Result<Json<Image>, ApiError> {
    if provider.id() != id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }
    require_own_image(&state, id, image_id).await?;

    let image = state.provider_service.set_profile_image(id, image_id).await?;
    Ok(Json(image))
}

/// DELETE /api/providers/{id}/images/{imageid}
pub async fn delete_image(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path((id, image_id)): Path<(i64, i64)>,
) -> Result<SuccessMessage, ApiError> {
    if provider.id() != id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }
    require_own_image(&state, id, image_id).await?;

    state.provider_service.delete_image(id, image_id).await?;
    Ok(SuccessMessage::ok("Image got deleted successfully"))
}

/// DELETE /api/providers/{id}/links/{linkid}
pub async fn delete_link(
    State(state): State<AppState>,
    RequireProvider(provider): RequireProvider,
    Path((id, link_id)): Path<(i64, i64)>,
) -> Result<SuccessMessage, ApiError> {
    if provider.id() != id {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }
    let links = state.provider_service.links(id).await?;
    if !links.iter().any(|link| link.id == link_id) {
        return Err(ApiError::unauthorized(GUARD_FAILED));
    }

    state.provider_service.delete_link(link_id).await?;
    Ok(SuccessMessage::ok("Link got deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_flattens_provider_fields() {
        let body = serde_json::json!({
            "id": 3,
            "name": "Yoga Loft",
            "isPublished": true,
            "links": [{ "linkText": "Site", "url": "https://yoga.example.com" }]
        });

        let parsed: UpdateProviderBody = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.id, Some(3));
        assert_eq!(parsed.update.name.as_deref(), Some("Yoga Loft"));
        assert_eq!(parsed.update.is_published, Some(true));
        assert_eq!(parsed.update.links.as_ref().map(Vec::len), Some(1));
    }
}
