// Tollgate API - Local Development Server

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use sqlx::PgPool;
use tollgate_accounts::{InMemoryUserStore, PgUserStore};
use tollgate_auth::{AuthBackend, AuthConfig, UserStore};
use tollgate_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .pretty()
        .init();

    info!("Starting Tollgate API local development server");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let auth_config = AuthConfig::from_env().map_err(|e| {
        error!("Failed to load authentication configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    let store = user_store(&config).await?;
    let backend = AuthBackend::new(auth_config, store);

    let app = tollgate_app::create_app(backend).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .into_inner(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("Server starting on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store
/// seeded from `DEV_USER_LOGIN` / `DEV_USER_EMAIL` / `DEV_USER_PASSWORD`
async fn user_store(config: &Config) -> anyhow::Result<Arc<dyn UserStore>> {
    if let Some(database_url) = &config.database_url {
        let pool = PgPool::connect(database_url).await.map_err(|e| {
            error!("Failed to connect to database: {}", e);
            anyhow::anyhow!("Database connection failed: {}", e)
        })?;

        info!("Database connection established");

        let store = PgUserStore::new(pool);
        store.migrate().await?;
        return Ok(Arc::new(store));
    }

    warn!("DATABASE_URL not set, using in-memory account store");
    let store = InMemoryUserStore::new();

    let login = std::env::var("DEV_USER_LOGIN").ok();
    let password = std::env::var("DEV_USER_PASSWORD").ok();
    if let (Some(login), Some(password)) = (login, password) {
        let email = std::env::var("DEV_USER_EMAIL")
            .unwrap_or_else(|_| format!("{}@localhost", login));
        let account = store.add_account(&login, &email, &password)?;
        info!(user_id = account.id, login = %account.login, "Seeded development account");
    }

    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
