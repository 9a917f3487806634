//! HTTP JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api` | Full conversation log snapshot |
//! | `POST` | `/api/ask` | Ask a question; appends a turn |
//! | `POST` | `/api/word_suggestions` | Lexical suggestions over the static vocabulary |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Failures never leak raw internals. Out-of-scope queries and
//! generation outages degrade to the configured fallback answer inside
//! a normal 200 response; everything else maps to
//! `{ "error": { "code": ..., "message": ... } }` with a non-2xx status.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser
//! client can call the API cross-origin.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::embedding::Embedder;
use crate::error::GenerationError;
use crate::generate::{answer_question, Generator};
use crate::history::ConversationLog;
use crate::index::EmbeddingIndex;
use crate::models::ChatMessage;
use crate::scope::is_in_scope;
use crate::suggest::suggest_questions;
use crate::word_suggest::suggest_words;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub index: Arc<EmbeddingIndex>,
    pub embedder: Arc<dyn Embedder>,
    pub generator: Arc<dyn Generator>,
    pub log: Arc<ConversationLog>,
}

/// Build the application router. Split out from [`run_server`] so tests
/// can serve it on an ephemeral port.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(handle_history))
        .route("/api/ask", post(handle_ask))
        .route("/api/word_suggestions", post(handle_word_suggestions))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is terminated.
pub async fn run_server(state: AppState) -> anyhow::Result<()> {
    let bind_addr = state.config.server.bind.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn retrieval_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "retrieval_error".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api ============

#[derive(Serialize)]
struct HistoryResponse {
    items: Vec<ChatMessage>,
}

async fn handle_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        items: state.log.snapshot().await,
    })
}

// ============ POST /api/ask ============

#[derive(Deserialize)]
struct AskRequest {
    data: String,
}

#[derive(Serialize)]
struct AskResponse {
    items: Vec<ChatMessage>,
    questions: Vec<String>,
}

/// One full chat turn: scope gate, then answer + suggestions for
/// in-scope queries or the configured fallback otherwise. The turn is
/// appended as a Human/Assistant pair in all non-error outcomes.
async fn handle_ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let query = request.data;
    let retrieval = &state.config.retrieval;
    let generation = &state.config.generation;

    let in_scope = is_in_scope(
        &state.index,
        state.embedder.as_ref(),
        &query,
        retrieval.scope_threshold,
    )
    .await
    .map_err(|e| {
        tracing::error!("scope check failed: {:#}", e);
        retrieval_error("could not evaluate the question against the index")
    })?;

    let (answer, questions) = if in_scope {
        let history = state.log.snapshot().await;
        let answer = match answer_question(
            state.generator.as_ref(),
            state.embedder.as_ref(),
            &state.index,
            &history,
            &query,
            retrieval,
            generation,
        )
        .await
        {
            Ok(answer) => answer,
            Err(GenerationError::Provider(e)) => {
                // Degrade rather than fail the turn; the user still
                // gets a well-formed reply.
                tracing::error!("generation failed, serving fallback: {:#}", e);
                generation.fallback_message.clone()
            }
            Err(GenerationError::Retrieval(e)) => {
                tracing::error!("retrieval failed: {:#}", e);
                return Err(retrieval_error("could not retrieve supporting context"));
            }
        };

        // Suggestions are best-effort; an empty list is a valid answer.
        let questions = match suggest_questions(
            &state.index,
            state.embedder.as_ref(),
            &query,
            retrieval.top_match_threshold,
            retrieval.suggestion_count,
        )
        .await
        {
            Ok(questions) => questions,
            Err(e) => {
                tracing::warn!("suggestion ranking failed: {:#}", e);
                Vec::new()
            }
        };

        (answer, questions)
    } else {
        tracing::debug!("query classified out of scope");
        (generation.fallback_message.clone(), Vec::new())
    };

    let items = state.log.append_turn(&query, &answer).await;
    Ok(Json(AskResponse { items, questions }))
}

// ============ POST /api/word_suggestions ============

#[derive(Deserialize)]
struct WordSuggestionsRequest {
    user_input: String,
}

#[derive(Serialize)]
struct WordSuggestionsResponse {
    suggestions: Vec<String>,
}

async fn handle_word_suggestions(
    State(state): State<AppState>,
    Json(request): Json<WordSuggestionsRequest>,
) -> Result<Json<WordSuggestionsResponse>, AppError> {
    let suggestions = suggest_words(
        &state.config.vocabulary.words,
        &request.user_input,
        state.config.retrieval.suggestion_count,
    )
    .map_err(|e| bad_request(e.to_string()))?;

    Ok(Json(WordSuggestionsResponse { suggestions }))
}
