pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::error::ApiError;
use crate::models::{AuthSession, Grader};
use crate::services::cache::TtlCache;
use crate::services::reporter::Reporter;
use crate::services::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub reporter: Reporter,
    auth_cache: Arc<Mutex<TtlCache<String, AuthSession>>>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let db = Arc::new(db);
        Self {
            reporter: Reporter::new(db.clone()),
            sessions: Arc::new(SessionStore::new(
                config.study_session_capacity,
                config.study_session_ttl,
            )),
            auth_cache: Arc::new(Mutex::new(TtlCache::new(
                config.auth_cache_capacity,
                config.auth_cache_ttl,
            ))),
            config: Arc::new(config),
            db,
        }
    }

    /// Grader configured for written answers
    pub fn grader(&self) -> Grader {
        Grader::new(self.config.written_matching)
    }

    pub(crate) fn auth_cache(&self) -> error::Result<MutexGuard<'_, TtlCache<String, AuthSession>>> {
        self.auth_cache
            .lock()
            .map_err(|_| ApiError::Internal("auth cache lock poisoned".to_string()))
    }
}

/// Build the full router
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Study set routes
        .route("/api/sets/:id/deck", get(routes::sets::deck))
        .route("/api/sets/:id/study-count", get(routes::sets::study_count))
        .route("/api/sets/:id/results", get(routes::sets::results))
        .route("/api/sets/:id/sessions", post(routes::sessions::start))
        // Session routes
        .route(
            "/api/sessions/:id",
            get(routes::sessions::get).delete(routes::sessions::discard),
        )
        .route("/api/sessions/:id/commands", post(routes::sessions::command))
        // Result routes
        .route("/api/results/stats", get(routes::results::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.addr();
    let app = router(AppState::new(db, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
