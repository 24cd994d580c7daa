//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::auth::TokenSigner;
use crate::infrastructure::services::{
    AuthService, CourseDateService, CourseService, MemberService, ProviderService,
};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub member_service: Arc<MemberService>,
    pub provider_service: Arc<ProviderService>,
    pub course_service: Arc<CourseService>,
    pub course_date_service: Arc<CourseDateService>,
    pub token_signer: Arc<dyn TokenSigner>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        member_service: Arc<MemberService>,
        provider_service: Arc<ProviderService>,
        course_service: Arc<CourseService>,
        course_date_service: Arc<CourseDateService>,
        token_signer: Arc<dyn TokenSigner>,
    ) -> Self {
        Self {
            auth_service,
            member_service,
            provider_service,
            course_service,
            course_date_service,
            token_signer,
        }
    }
}
