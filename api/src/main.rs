use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sg_api::{create_app, AppState};
use sg_core::{SessionConfig, SessionService};
use sg_infra::{BcryptHasher, DatabasePool, LogEmailService, MySqlUserRepository, RedisClient, RedisStore};
use sg_shared::config::{AppConfig, LoggingConfig};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(logging.with_target);

    if logging.compact {
        builder.compact().init();
    } else {
        builder.init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);
    config.validate().context("invalid configuration")?;

    tracing::info!(environment = %config.environment, "Starting SessionGate API server");
    if config.auth.jwt.is_using_default_secret() {
        tracing::warn!("JWT_SECRET is not set; using the development secret");
    }

    let database = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to MySQL")?;
    database.ensure_schema().await.context("failed to prepare schema")?;

    let redis = RedisClient::new(config.cache.clone())
        .await
        .context("failed to connect to Redis")?;

    let session = SessionService::new(
        Arc::new(MySqlUserRepository::new(database.get_pool().clone())),
        Arc::new(BcryptHasher::default()),
        Arc::new(LogEmailService::new(config.email.from_address.clone())),
        Arc::new(RedisStore::new(redis)),
        SessionConfig::from(&config),
    );
    let state = web::Data::new(AppState::new(Arc::new(session)));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(state.clone()));
    // Zero keeps actix's default of one worker per core
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    database.close().await;
    Ok(())
}
