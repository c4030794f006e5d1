//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::{Context, bail};
use auth::{AuthConfig, PgAuthRepository, SessionRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const REAPER_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_store = PgAuthRepository::new(pool.clone());

    // Startup cleanup; errors here should not prevent server startup
    reap_expired_sessions(&auth_store).await;
    spawn_session_reaper(auth_store.clone());

    let auth_config = load_auth_config()?;
    tracing::info!(
        access_ttl_secs = auth_config.access_token_ttl.as_secs(),
        refresh_ttl_secs = auth_config.refresh_token_ttl.as_secs(),
        peppered = auth_config.password_pepper.is_some(),
        "Auth configuration loaded"
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .merge(auth_router(auth_store, auth_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build `AuthConfig` from the environment.
///
/// Release builds refuse to start without `AUTH_SIGNING_SECRET`; debug
/// builds fall back to a random secret and an insecure cookie.
fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("AUTH_SIGNING_SECRET") {
        Ok(secret_b64) => AuthConfig {
            signing_secret: decode_secret(&secret_b64)?,
            ..AuthConfig::default()
        },
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_SIGNING_SECRET not set, using a random development secret");
            AuthConfig::development()
        }
        Err(_) => bail!("AUTH_SIGNING_SECRET must be set in production"),
    };

    if let Ok(pepper) = env::var("AUTH_PASSWORD_PEPPER") {
        if !pepper.is_empty() {
            config.password_pepper = Some(pepper.into_bytes());
        }
    }

    if let Some(secs) = env_secs("ACCESS_TOKEN_TTL_SECS")? {
        config.access_token_ttl = secs;
    }
    if let Some(secs) = env_secs("REFRESH_TOKEN_TTL_SECS")? {
        config.refresh_token_ttl = secs;
    }

    Ok(config)
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("AUTH_SIGNING_SECRET must be base64")?;

    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        anyhow::anyhow!(
            "AUTH_SIGNING_SECRET must decode to 32 bytes, got {}",
            bytes.len()
        )
    })
}

fn env_secs(name: &str) -> anyhow::Result<Option<Duration>> {
    match env::var(name) {
        Ok(raw) => parse_ttl_secs(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

/// Whole seconds, positive, and small enough that `now + ttl` is a valid
/// timestamp
fn parse_ttl_secs(name: &str, raw: &str) -> anyhow::Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds", name))?;
    if secs == 0 {
        bail!("{} must be positive", name);
    }

    let ttl = Duration::from_secs(secs);
    let reachable = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .is_some();
    if !reachable {
        bail!("{} is out of range", name);
    }

    Ok(ttl)
}

async fn reap_expired_sessions(store: &PgAuthRepository) {
    match store.delete_expired_sessions(Utc::now()).await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }
}

fn spawn_session_reaper(store: PgAuthRepository) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REAPER_INTERVAL);
        // First tick fires immediately; startup already reaped
        interval.tick().await;
        loop {
            interval.tick().await;
            reap_expired_sessions(&store).await;
        }
    });
}
