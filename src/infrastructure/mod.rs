//! Infrastructure layer - External service implementations

pub mod auth;
pub mod logging;
pub mod mail;
pub mod object_storage;
pub mod repositories;
pub mod services;
pub mod storage;
