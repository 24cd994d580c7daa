pub mod entity;
pub mod repository;

pub use entity::Course;
pub use repository::CourseRepository;
