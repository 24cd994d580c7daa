pub mod app_config;

pub use app_config::{
    AppConfig, DatabaseConfig, JwtConfig, LogFormat, LoggingConfig, MailConfig,
    ObjectStorageConfig, ServerConfig,
};
