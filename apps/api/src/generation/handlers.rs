//! Axum route handlers for the Posts API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::errors::AppError;
use crate::generation::generator::{copy_text, generate_post, normalize_hashtag, GeneratedPost};
use crate::generation::params::{GenerateRequest, PostOptions};
use crate::generation::scoring::{engagement_score, ScoreBand};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub band: ScoreBand,
}

#[derive(Debug, Deserialize)]
pub struct CopyRequest {
    pub text: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub copy_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/posts/options
pub async fn handle_options() -> Json<PostOptions> {
    Json(PostOptions::catalog())
}

/// POST /api/v1/posts/generate
///
/// One LLM call per request. Unparseable model output still succeeds as
/// `Unstructured` content.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GeneratedPost>, AppError> {
    // Generation is never cancelled; the token only satisfies the client contract.
    let post = generate_post(&state.llm, request, &CancellationToken::new()).await?;
    Ok(Json(post))
}

/// POST /api/v1/posts/score
pub async fn handle_score(Json(request): Json<ScoreRequest>) -> Json<ScoreResponse> {
    let score = engagement_score(&request.text);
    Json(ScoreResponse {
        score,
        band: ScoreBand::from_score(score),
    })
}

/// POST /api/v1/posts/copy
///
/// Builds the clipboard text: post, blank line, hashtags.
pub async fn handle_copy(Json(request): Json<CopyRequest>) -> Json<CopyResponse> {
    let hashtags: Vec<String> = request
        .hashtags
        .iter()
        .filter_map(|t| normalize_hashtag(t))
        .collect();
    Json(CopyResponse {
        copy_text: copy_text(&request.text, &hashtags),
    })
}
