//! OBD2 Log Viewer API Server
//!
//! REST surface for the single-session log viewer: upload a CSV log,
//! toggle sensor selection, and render line charts with summary
//! statistics. Every user interaction is one synchronous re-evaluation
//! of the session state.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use session::{LogInfo, SessionStore};
use tokio::sync::RwLock;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod config;
mod routes;

pub use config::ViewerConfig;

/// Application state shared across handlers
pub struct AppState {
    /// The single viewer session
    pub session: SessionStore,
    /// Runtime configuration
    pub config: ViewerConfig,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            session: SessionStore::new(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Shared handle to the application state
pub type SharedState = Arc<RwLock<AppState>>;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub log: Option<LogInfo>,
    pub metrics: SessionMetrics,
}

/// Session metrics
#[derive(Debug, Serialize)]
pub struct SessionMetrics {
    pub cached_tables: usize,
    pub selected_sensors: usize,
}

/// Create the application router
pub fn create_router(state: SharedState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/logs", post(routes::logs::upload))
        .route("/api/v1/sensors", get(routes::sensors::list))
        .route("/api/v1/sensors/select", post(routes::sensors::select))
        .route(
            "/api/v1/sensors/select-matches",
            post(routes::sensors::select_matches),
        )
        .route(
            "/api/v1/sensors/deselect-all",
            post(routes::sensors::deselect_all),
        )
        .route("/api/v1/chart", get(routes::chart::render))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        log: state.session.info().cloned(),
        metrics: SessionMetrics {
            cached_tables: state.session.cached_tables(),
            selected_sensors: state.session.selected_count(),
        },
    };

    Json(response)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(config: ViewerConfig) -> std::io::Result<()> {
    let addr = config.bind_addr.clone();
    let max_upload_bytes = config.max_upload_bytes;
    let state = Arc::new(RwLock::new(AppState::new(config)));
    let app = create_router(state, max_upload_bytes);

    info!("Starting viewer API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
