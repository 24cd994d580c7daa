pub mod entity;
pub mod repository;

pub use entity::Member;
pub use repository::MemberRepository;
