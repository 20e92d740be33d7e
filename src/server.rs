//! HTTP server exposing the resolution engine.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use faq_relay_core::{
    engine::{self, EngineOptions},
    models::ResolutionOutcome,
    resolve::AnswerGenerator,
    store::KnowledgeStore,
};

use crate::config::Config;

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    opts: Arc<EngineOptions>,
    store: Arc<dyn KnowledgeStore>,
    generator: Arc<dyn AnswerGenerator>,
}

/// Error response with an HTTP status and a flat `{"error": ...}` body.
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn upstream(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    answer: String,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    if req.question.trim().is_empty() {
        return Err(AppError::bad_request("question must not be empty"));
    }

    let outcome = engine::answer(
        state.store.as_ref(),
        state.generator.as_ref(),
        &state.opts,
        &req.question,
    )
    .await
    .map_err(|e| {
        error!("resolution failed: {:#}", e);
        AppError::upstream("knowledge base is unavailable")
    })?;

    let response = match outcome {
        ResolutionOutcome::Answered {
            answer,
            matched_question,
            score,
        } => AskResponse {
            answer,
            matched: Some(matched_question),
            score: Some(score),
        },
        ResolutionOutcome::Generated { answer } => AskResponse {
            answer,
            matched: None,
            score: None,
        },
        ResolutionOutcome::Unresolved => AskResponse {
            answer: state.config.fallback.unresolved_message.clone(),
            matched: None,
            score: None,
        },
    };

    Ok(Json(response))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ask", post(ask_traced))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

async fn ask_traced(
    state: State<AppState>,
    req: Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let request_id = Uuid::new_v4();
    ask_handler(state, req)
        .instrument(info_span!("ask", %request_id))
        .await
}

/// Run the HTTP server until the process is stopped.
pub async fn run_server(
    config: Config,
    store: Arc<dyn KnowledgeStore>,
    generator: Arc<dyn AnswerGenerator>,
) -> anyhow::Result<()> {
    let opts = Arc::new(config.engine_options()?);
    let bind = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config),
        opts,
        store,
        generator,
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("listening on {}", bind);
    axum::serve(listener, app).await?;
    Ok(())
}
