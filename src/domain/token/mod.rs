pub mod entity;
pub mod repository;

pub use entity::AuthToken;
pub use repository::TokenRepository;
