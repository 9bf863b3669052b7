//! Fintrack Web Server
//!
//! Axum-based REST API exposing the Fintrack analytics core: dashboard stats,
//! insights, chart reports and the scenario simulator.
//!
//! - Restrictive CORS policy (explicit origin allow-list)
//! - Input validation (pagination limits, date and enum parsing)
//! - Sanitized error responses
//! - Analysis results memoized on a content fingerprint of the snapshot

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use fintrack_core::db::Database;
use fintrack_core::{InsightEngine, TransactionSource};

mod cache;
mod handlers;

pub use cache::{Analysis, AnalysisCache};

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Environment variable holding a comma-separated CORS origin allow-list
pub const ALLOWED_ORIGINS_ENV: &str = "FINTRACK_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Number of analysis results kept in memory
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            cache_capacity: 64,
        }
    }
}

impl ServerConfig {
    /// Defaults, with allowed origins taken from `FINTRACK_ALLOWED_ORIGINS`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self {
            allowed_origins,
            ..Self::default()
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    /// Where analytics snapshots come from
    pub source: Arc<dyn TransactionSource>,
    /// Writable store; `None` when serving a read-only fixture
    pub db: Option<Database>,
    pub engine: InsightEngine,
    pub config: ServerConfig,
    pub cache: AnalysisCache,
}

impl AppState {
    /// State backed by the live store (reads and writes)
    pub fn with_database(db: Database, engine: InsightEngine, config: ServerConfig) -> Self {
        Self {
            source: Arc::new(db.clone()),
            db: Some(db),
            engine,
            cache: AnalysisCache::new(config.cache_capacity),
            config,
        }
    }

    /// Read-only state over any transaction source
    pub fn with_source(
        source: Arc<dyn TransactionSource>,
        engine: InsightEngine,
        config: ServerConfig,
    ) -> Self {
        Self {
            source,
            db: None,
            engine,
            cache: AnalysisCache::new(config.cache_capacity),
            config,
        }
    }
}

/// Build the API router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::get_transaction).delete(handlers::delete_transaction),
        )
        // Dashboard
        .route("/stats", get(handlers::get_stats))
        .route("/insights", get(handlers::get_insights))
        // Reports
        .route("/reports/trends", get(handlers::report_trends))
        .route("/reports/categories", get(handlers::report_categories))
        .route("/reports/income", get(handlers::report_income))
        // Scenario simulator
        .route("/scenario", post(handlers::simulate));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        return layer;
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Start the server
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    if !state.config.allowed_origins.is_empty() {
        info!(origins = ?state.config.allowed_origins, "CORS origins allowed");
    }
    info!(source = %state.source.describe(), "Serving transactions");

    let app = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes reported by the core are safe to echo back
        match err.downcast_ref::<fintrack_core::Error>() {
            Some(core @ fintrack_core::Error::InvalidInput(_)) => {
                return Self::bad_request(&core.to_string());
            }
            Some(core @ fintrack_core::Error::NotFound(_)) => {
                return Self::not_found(&core.to_string());
            }
            _ => {}
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
