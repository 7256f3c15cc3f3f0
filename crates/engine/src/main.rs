//! Realmhost Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod infrastructure;
mod use_cases;

use app::{App, Repositories};
use infrastructure::app_settings::AppSettings;
use infrastructure::clock::SystemClock;
use infrastructure::docker::DockerRuntime;
use infrastructure::ports::{ClockPort, ContainerRuntime, SettingsRepo};
use infrastructure::settings::SqliteSettingsRepo;
use infrastructure::sqlite;
use use_cases::LifecycleConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "realmhost_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Realmhost Engine");

    // Load configuration
    let db_path = std::env::var("REALMHOST_DB").unwrap_or_else(|_| "realmhost.db".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "8000".into())
        .parse()
        .unwrap_or(8000);
    let admin_key = std::env::var("ADMIN_KEY").ok();
    if admin_key.is_none() {
        tracing::warn!("ADMIN_KEY not set, admin endpoints are disabled");
    }
    let lifecycle_config = LifecycleConfig {
        image: std::env::var("REALM_SERVER_IMAGE").unwrap_or_else(|_| "realm-server".into()),
        ..LifecycleConfig::default()
    };

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    // The container runtime must be reachable before serving anything.
    let docker = DockerRuntime::connect()
        .map_err(|e| anyhow::anyhow!("Docker is required to run, but it is not available: {e}"))?;
    docker.ping().await.map_err(|e| {
        anyhow::anyhow!("Docker is required to run, but its daemon is not reachable: {e}")
    })?;
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(docker);

    // Open the database and build the repositories
    tracing::info!("Opening database at {}", db_path);
    let pool = sqlite::connect(&db_path).await?;
    let settings_repo = Arc::new(SqliteSettingsRepo::new(pool.clone(), clock.clone()).await?);

    // Seed settings from the defaults table on first run
    if settings_repo.get().await?.is_none() {
        settings_repo.save(&AppSettings::default()).await?;
        tracing::info!("Seeded default application settings");
    }

    let repositories = Repositories {
        world: Arc::new(sqlite::SqliteWorldRepo::new(pool.clone())),
        slot: Arc::new(sqlite::SqliteSlotRepo::new(pool.clone())),
        player: Arc::new(sqlite::SqlitePlayerRepo::new(pool.clone())),
        settings: settings_repo,
    };

    // Create application
    let app = Arc::new(App::new(
        repositories,
        runtime,
        lifecycle_config,
        clock,
        admin_key,
    ));

    // Build router
    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::COOKIE,
            axum::http::header::AUTHORIZATION,
        ]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
