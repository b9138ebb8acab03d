//! HTTP Endpoints
//!
//! REST API over the translation pipeline:
//! - `POST /api/translate`: lyrics → structured translation
//! - `POST /api/chat`: follow-up question about one translated word
//!   (also mounted at `/chat` for existing web clients)
//! - `GET /health`, `GET /metrics`

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lyric_tutor_core::{
    ContinuationId, Error, Operation, QaAnswer, TranslatedWord, TranslationResult,
};

use crate::metrics::metrics_handler;
use crate::state::AppState;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);

    Router::new()
        .route("/api/translate", post(translate))
        .route("/api/chat", post(chat))
        .route("/chat", post(chat))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns a permissive layer
/// - If cors_origins is empty or all invalid, allows localhost:3000 only
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let parsed_origins = if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to {}", DEFAULT_CORS_ORIGIN);
        vec![HeaderValue::from_static(DEFAULT_CORS_ORIGIN)]
    } else {
        tracing::info!("CORS configured with {} origins", parsed_origins.len());
        parsed_origins
    };

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Error payload returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler failure. Only the user-safe message leaves the process.
#[derive(Debug)]
pub enum ApiError {
    Pipeline(Error),
    Timeout(Operation),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Pipeline(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Pipeline(err) => {
                let status = match err {
                    Error::InputRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    Error::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
                };
                (status, err.user_message())
            },
            ApiError::Timeout(operation) => (
                StatusCode::GATEWAY_TIMEOUT,
                Error::upstream(*operation, "timed out").user_message(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Lyrics submission
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub lyrics: String,
}

/// Follow-up question about one word of a translation
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub word: TranslatedWord,
    pub query: String,
    /// Tag-free narrative of the translation
    #[serde(default)]
    pub translated_output: String,
    #[serde(default)]
    pub previous_response_id: Option<ContinuationId>,
}

impl ChatRequest {
    /// Continuation handle, treating an empty id as absent
    fn continuation(&self) -> Option<ContinuationId> {
        self.previous_response_id
            .clone()
            .filter(|id| !id.as_str().is_empty())
    }
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslationResult>, ApiError> {
    let result = tokio::time::timeout(
        state.request_timeout(),
        state.translator.translate(&request.lyrics),
    )
    .await
    .map_err(|_| {
        tracing::error!(timeout = ?state.request_timeout(), "Translation timed out");
        ApiError::Timeout(Operation::Translation)
    })??;

    Ok(Json(result))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<QaAnswer>, ApiError> {
    let answer = tokio::time::timeout(
        state.request_timeout(),
        state.questions.ask(
            &request.word,
            &request.translated_output,
            &request.query,
            request.continuation(),
        ),
    )
    .await
    .map_err(|_| {
        tracing::error!(timeout = ?state.request_timeout(), "Question timed out");
        ApiError::Timeout(Operation::Question)
    })??;

    Ok(Json(answer))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.translator.model_name(),
    }))
}
