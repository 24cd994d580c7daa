//! Storage infrastructure - connection pool and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{run_migrations, Migration, PostgresMigrator};
pub use postgres::connect_pool;
