pub mod entity;
pub mod repository;

pub use entity::{Image, ImageOwner};
pub use repository::ImageRepository;
