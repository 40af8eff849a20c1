use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordlink_engine::cache::CacheStats;
use wordlink_engine::{
    EngineConfig, ErrorResponse, FirstWordResponse, GameEngine, GameEngineError, NextWordRequest,
    NextWordResponse,
};

#[derive(Clone)]
struct AppState {
    engine: Arc<GameEngine>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    cache: CacheStats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordlink_server=debug,wordlink_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match std::env::var("WORDLINK_CONFIG") {
        Ok(path) => {
            tracing::info!("📄 Config: {}", path);
            EngineConfig::from_yaml_file(&path)?
        }
        Err(_) => EngineConfig::default(),
    };
    config.apply_env();
    config.validate()?;

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8090);

    tracing::info!("🚀 Starting Wordlink Game Engine Server");
    tracing::info!("📦 Embeddings: {}", config.data.embeddings.display());
    tracing::info!("🔧 Filter: {}", config.filter);
    tracing::info!("🔌 Port: {}", port);

    // All startup data is loaded before the listener binds
    let engine = GameEngine::new(config).await?;

    let state = AppState {
        engine: Arc::new(engine),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/first_word", get(first_word_handler))
        .route("/next_word", post(next_word_handler))
        .route("/v1/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("🎮 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: wordlink_engine::VERSION.to_string(),
    })
}

async fn first_word_handler(
    State(state): State<AppState>,
) -> Result<Json<FirstWordResponse>, AppError> {
    Ok(Json(state.engine.first_word()?))
}

async fn next_word_handler(
    State(state): State<AppState>,
    Json(req): Json<NextWordRequest>,
) -> Result<Json<NextWordResponse>, AppError> {
    tracing::debug!("Next word request: {:?}", req);

    let response = state.engine.next_word(req).await?;

    Ok(Json(response))
}

async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let cache = state.engine.cache_stats().await?;

    Ok(Json(StatsResponse { cache }))
}

// Error handling
struct AppError(GameEngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GameEngineError::UnknownWord(_) => StatusCode::BAD_REQUEST,
            GameEngineError::NoCandidateFound { .. } => StatusCode::CONFLICT,
            GameEngineError::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GameEngineError::Cache(_) | GameEngineError::Database(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("❌ Error: {} - {}", status, self.0);
        } else {
            tracing::warn!("⚠️ {} - {}", status, self.0);
        }

        let body = ErrorResponse {
            error: self.0.to_string(),
            code: self.0.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<GameEngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
