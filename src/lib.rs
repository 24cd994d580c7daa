//! Activise API
//!
//! Backend for a small course marketplace: providers publish courses and
//! members enroll. Ships dual-principal JWT authentication with refresh
//! token rotation, image uploads to object storage and transactional mail.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use infrastructure::auth::{Argon2Hasher, JwtSigner, PasswordHasher, TokenSigner};
use infrastructure::mail::{HttpApiMailer, Mailer, NoopMailer};
use infrastructure::object_storage::{ObjectStore, S3ObjectStore};
use infrastructure::repositories::{
    PostgresCourseDateRepository, PostgresCourseRepository, PostgresImageRepository,
    PostgresLinkRepository, PostgresMemberRepository, PostgresProviderRepository,
    PostgresTokenRepository,
};
use infrastructure::services::{
    AuthService, CourseDateService, CourseService, ImageService, MemberService, ProviderService,
    TokenService,
};
use infrastructure::storage::connect_pool;

/// Build the JWT signer from config: RS256 when key files are configured,
/// HS256 secret otherwise.
fn create_token_signer(config: &config::JwtConfig) -> anyhow::Result<Arc<dyn TokenSigner>> {
    if let (Some(private_path), Some(public_path)) =
        (&config.private_key_path, &config.public_key_path)
    {
        let private_pem = std::fs::read(private_path)
            .with_context(|| format!("Failed to read private key from {}", private_path))?;
        let public_pem = std::fs::read(public_path)
            .with_context(|| format!("Failed to read public key from {}", public_path))?;

        let signer = JwtSigner::rs256(&private_pem, &public_pem)
            .context("Failed to build RS256 signer from configured key pair")?;
        info!("JWT signing: RS256 key pair");
        return Ok(Arc::new(signer));
    }

    let secret = config
        .secret
        .as_deref()
        .context("Either jwt.secret or a jwt key pair must be configured")?;
    info!("JWT signing: HS256 shared secret");
    Ok(Arc::new(JwtSigner::hs256(secret)))
}

fn create_mailer(config: &config::MailConfig) -> Arc<dyn Mailer> {
    if config.enabled {
        Arc::new(HttpApiMailer::from_config(config))
    } else {
        info!("Mail delivery disabled, using no-op mailer");
        Arc::new(NoopMailer)
    }
}

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Connecting to PostgreSQL...");
    let pool = connect_pool(&config.database).await?;
    info!("PostgreSQL connection established");

    create_app_state_with_pool(config, pool).await
}

/// Create the application state on an existing connection pool
pub async fn create_app_state_with_pool(
    config: &AppConfig,
    pool: sqlx::PgPool,
) -> anyhow::Result<AppState> {
    let token_signer = create_token_signer(&config.jwt)?;
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher);
    let mailer = create_mailer(&config.mail);
    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::from_config(&config.object_storage).await);

    let member_repo = Arc::new(PostgresMemberRepository::new(pool.clone()));
    let provider_repo = Arc::new(PostgresProviderRepository::new(pool.clone()));
    let course_repo = Arc::new(PostgresCourseRepository::new(pool.clone()));
    let course_date_repo = Arc::new(PostgresCourseDateRepository::new(pool.clone()));
    let link_repo = Arc::new(PostgresLinkRepository::new(pool.clone()));
    let image_repo = Arc::new(PostgresImageRepository::new(pool.clone()));
    let token_repo = Arc::new(PostgresTokenRepository::new(pool.clone()));

    let image_service = Arc::new(ImageService::new(image_repo, store));

    let member_service = Arc::new(MemberService::new(
        member_repo,
        token_repo.clone(),
        hasher.clone(),
        image_service.clone(),
    ));
    let provider_service = Arc::new(ProviderService::new(
        provider_repo,
        link_repo,
        course_repo.clone(),
        course_date_repo.clone(),
        token_repo.clone(),
        hasher.clone(),
        image_service.clone(),
    ));
    let course_service = Arc::new(CourseService::new(
        course_repo,
        course_date_repo.clone(),
        image_service,
    ));
    let course_date_service = Arc::new(CourseDateService::new(course_date_repo));

    let auth_service = Arc::new(AuthService::new(
        member_service.clone(),
        provider_service.clone(),
        Arc::new(TokenService::new(token_repo)),
        token_signer.clone(),
        hasher,
        mailer,
        config.jwt.access_ttl_secs,
        config.jwt.refresh_ttl_secs,
        config.mail.frontend_url.clone(),
    ));

    Ok(AppState::new(
        auth_service,
        member_service,
        provider_service,
        course_service,
        course_date_service,
        token_signer,
    ))
}
