use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::assistant::prompts::QUICK_QUESTIONS;
use crate::assistant::session::SessionView;
use crate::errors::AppError;
use crate::llm_client::{CallOptions, CHAT_MODEL};
use crate::state::AppState;

const CHAT_OPTIONS: CallOptions = CallOptions {
    max_tokens: 512,
    temperature: 0.6,
};

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct TurnResponse {
    pub session: SessionView,
    /// Set when the provider call failed; the transcript already holds an apology entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// GET /api/v1/assistant/quick-questions
pub async fn handle_quick_questions() -> Json<&'static [&'static str]> {
    Json(QUICK_QUESTIONS)
}

/// POST /api/v1/assistant/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    info!("Created chat session {}", session.id);
    (StatusCode::CREATED, Json(session))
}

/// GET /api/v1/assistant/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.get(id).await?))
}

/// DELETE /api/v1/assistant/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assistant/sessions/:id/messages
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    run_turn(&state, id, &request.text).await.map(Json)
}

/// POST /api/v1/assistant/sessions/:id/quick-questions/:index
pub async fn handle_quick_question(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<TurnResponse>, AppError> {
    let question = QUICK_QUESTIONS
        .get(index)
        .ok_or_else(|| AppError::NotFound(format!("Quick question {index} not found")))?;
    run_turn(&state, id, question).await.map(Json)
}

/// POST /api/v1/assistant/sessions/:id/cancel
pub async fn handle_cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, AppError> {
    let cancelled = state.sessions.cancel(id).await?;
    if cancelled {
        info!("Cancelled in-flight turn for session {id}");
    }
    Ok(Json(CancelResponse { cancelled }))
}

/// Runs one awaited chat turn. Provider failures are recorded in the transcript
/// and returned alongside it rather than as an HTTP error.
///
/// The call and its completion run on a spawned task, so the in-flight flag is
/// cleared even if the request future is dropped.
async fn run_turn(state: &AppState, id: Uuid, text: &str) -> Result<TurnResponse, AppError> {
    let turn = state.sessions.begin_turn(id, text).await?;

    let llm = state.llm.clone();
    let sessions = state.sessions.clone();
    let task = tokio::spawn(async move {
        let result = llm
            .call(CHAT_MODEL, &turn.messages, CHAT_OPTIONS, &turn.cancel)
            .await;
        if let Err(e) = &result {
            warn!("Chat turn failed for session {id}: {e}");
        }
        sessions.complete_turn(id, result).await
    });

    let (session, error) = task
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("chat turn task failed: {e}")))??;
    Ok(TurnResponse { session, error })
}
