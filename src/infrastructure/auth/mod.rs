//! Authentication infrastructure: password hashing and JWT signing.

pub mod jwt;
pub mod password;

pub use jwt::{AccessClaims, JwtSigner, TokenSigner};
pub use password::{Argon2Hasher, PasswordHasher};
