//! Domain layer - entities, repository traits and validation rules

pub mod course;
pub mod course_date;
pub mod error;
pub mod image;
pub mod link;
pub mod member;
pub mod principal;
pub mod provider;
pub mod token;
pub mod validation;

pub use course::{Course, CourseRepository};
pub use course_date::{CourseDate, CourseDateRepository};
pub use error::DomainError;
pub use image::{Image, ImageOwner, ImageRepository};
pub use link::{Link, LinkRepository};
pub use member::{Member, MemberRepository};
pub use principal::PrincipalType;
pub use provider::{Address, Provider, ProviderRepository};
pub use token::{AuthToken, TokenRepository};
