//! API middleware components

pub mod auth;

pub use auth::{bearer_token, refresh_cookie, RequireMember, RequireProvider};
