use std::sync::Arc;

use anyhow::Context;
use unilodge_server::application::auth_service::AuthService;
use unilodge_server::application::listing_service::ListingService;
use unilodge_server::data::listing_repository::PostgresListingRepository;
use unilodge_server::data::user_repository::PostgresUserRepository;
use unilodge_server::infrastructure::config::AppConfig;
use unilodge_server::infrastructure::database::{create_pool, run_migrations};
use unilodge_server::infrastructure::logging::init_logging;
use unilodge_server::infrastructure::security::JwtKeys;
use unilodge_server::server::start_rest_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;

    // no requests are served until storage is reachable and migrated
    let pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let listing_repo = Arc::new(PostgresListingRepository::new(pool));
    let tokens = Arc::new(JwtKeys::new(config.jwt_secret.clone()));

    let auth_service = AuthService::new(user_repo, tokens);
    let listing_service = ListingService::new(listing_repo);

    start_rest_server(config, auth_service, listing_service).await
}
