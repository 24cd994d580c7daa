pub mod address;
pub mod entity;
pub mod repository;

pub use address::Address;
pub use entity::Provider;
pub use repository::ProviderRepository;
