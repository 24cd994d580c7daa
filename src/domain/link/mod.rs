pub mod entity;
pub mod repository;

pub use entity::Link;
pub use repository::LinkRepository;
