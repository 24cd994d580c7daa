//! Course date endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::CourseDate;

pub fn create_course_dates_router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_course_date))
}

/// GET /api/course-dates/{id}
pub async fn get_course_date(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseDate>, ApiError> {
    let date = state.course_date_service.find(id).await?;
    Ok(Json(date))
}
