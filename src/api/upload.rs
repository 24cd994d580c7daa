//! Multipart handling for image uploads

use axum::extract::Multipart;

use crate::api::types::ApiError;
use crate::infrastructure::services::FileUpload;

/// Pull the `image` file out of a multipart body.
///
/// The frontend submits a single form field named `image`; anything else
/// is ignored. A body without a file is a 400.
pub async fn read_image_upload(mut multipart: Multipart) -> Result<FileUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?;

        if bytes.is_empty() {
            break;
        }

        return Ok(FileUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::bad_request("No file submitted"))
}
