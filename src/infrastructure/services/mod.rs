//! Infrastructure services

pub mod auth_service;
pub mod course_date_service;
pub mod course_service;
pub mod image_service;
pub mod member_service;
pub mod provider_service;
pub mod token_service;

pub use auth_service::{AuthService, TokenPair, GUARD_FAILED, LOGIN_FAILED};
pub use course_date_service::CourseDateService;
pub use course_service::{
    CourseDateRequest, CourseService, CreateCourseRequest, UpdateCourseRequest,
};
pub use image_service::{FileUpload, ImageService};
pub use member_service::{CreateMemberRequest, MemberService, UpdateMemberRequest};
pub use provider_service::{
    AddressRequest, CreateProviderRequest, LinkRequest, ProviderService, UpdateProviderRequest,
};
pub use token_service::TokenService;
