pub mod entity;
pub mod repository;

pub use entity::CourseDate;
pub use repository::CourseDateRepository;
