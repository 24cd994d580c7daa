//! Plain status/message envelope for mutations that return no resource

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::json::Json;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessMessage {
    pub status_code: u16,
    pub message: String,
}

impl SuccessMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
        }
    }

    pub fn created(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::CREATED.as_u16(),
            message: message.into(),
        }
    }
}

impl IntoResponse for SuccessMessage {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
