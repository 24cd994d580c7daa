//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod course_dates;
pub mod courses;
pub mod health;
pub mod members;
pub mod middleware;
pub mod providers;
pub mod router;
pub mod state;
pub mod types;
pub mod upload;

pub use middleware::{RequireMember, RequireProvider};
pub use router::{create_router, create_router_with_state};
pub use state::AppState;
