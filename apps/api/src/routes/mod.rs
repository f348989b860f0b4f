pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::generation::handlers as posts;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Posts API
        .route("/api/v1/posts/options", get(posts::handle_options))
        .route("/api/v1/posts/generate", post(posts::handle_generate))
        .route("/api/v1/posts/score", post(posts::handle_score))
        .route("/api/v1/posts/copy", post(posts::handle_copy))
        // Assistant API
        .route(
            "/api/v1/assistant/quick-questions",
            get(assistant::handle_quick_questions),
        )
        .route(
            "/api/v1/assistant/sessions",
            post(assistant::handle_create_session),
        )
        .route(
            "/api/v1/assistant/sessions/:id",
            get(assistant::handle_get_session).delete(assistant::handle_delete_session),
        )
        .route(
            "/api/v1/assistant/sessions/:id/messages",
            post(assistant::handle_send_message),
        )
        .route(
            "/api/v1/assistant/sessions/:id/quick-questions/:index",
            post(assistant::handle_quick_question),
        )
        .route(
            "/api/v1/assistant/sessions/:id/cancel",
            post(assistant::handle_cancel),
        )
        .with_state(state)
}
