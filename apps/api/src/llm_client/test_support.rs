//! In-process stand-in for the provider, for tests that must not touch the network.

use axum::Router;

use crate::llm_client::LlmClient;

/// Serves `router` on an ephemeral local port and returns its completions URL.
/// Handlers should be mounted at `/v1/chat/completions`.
pub async fn spawn_provider(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1/chat/completions")
}

/// Client with a test key pointed at `url`.
pub fn client(url: String) -> LlmClient {
    LlmClient::new(Some("test-key".to_string()), url).unwrap()
}

/// Client without a key; any remote call fails before the network.
pub fn keyless_client() -> LlmClient {
    LlmClient::new(None, "http://127.0.0.1:9/unused").unwrap()
}
