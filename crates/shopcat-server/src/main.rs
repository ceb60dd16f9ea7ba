mod api;
mod middleware;

use std::sync::Arc;

use shopcat_core::{AppConfig, CatalogRepository, Environment, StorageBackend};
use shopcat_db::{InMemoryCatalog, PgCatalogRepository};
use shopcat_facade::ProductCommonFacade;
use shopcat_mapper::{DefaultPricingService, StaticImagePaths};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopcat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = build_state(&config).await?;
    let auth = AuthState::new(
        &config.api_keys,
        matches!(config.env, Environment::Development),
    )?;
    let app = build_app(state, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        storage = %config.storage,
        "shopcat-server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let (repository, pool) = match config.storage {
        StorageBackend::Postgres => {
            let pool = shopcat_db::connect_pool_from_config(config).await?;
            let applied = shopcat_db::run_migrations(&pool).await?;
            tracing::info!(applied, "database migrations up to date");
            let repository: Arc<dyn CatalogRepository> =
                Arc::new(PgCatalogRepository::new(pool.clone()));
            (repository, Some(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory catalog; data is lost on shutdown");
            let repository: Arc<dyn CatalogRepository> = Arc::new(InMemoryCatalog::seeded());
            (repository, None)
        }
    };

    let facade = ProductCommonFacade::new(
        repository,
        Arc::new(DefaultPricingService::new()),
        Arc::new(StaticImagePaths::new(config.image_base_url.clone())),
    );
    Ok(AppState { facade, pool })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
