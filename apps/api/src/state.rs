use crate::assistant::session::SessionStore;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Assistant chat sessions, in memory only.
    pub sessions: SessionStore,
}
