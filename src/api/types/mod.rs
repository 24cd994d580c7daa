//! Shared request/response plumbing for the HTTP layer

pub mod error;
pub mod json;
pub mod success;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use success::SuccessMessage;
