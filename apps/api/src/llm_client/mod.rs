/// LLM Client — the single point of entry for all Groq API calls in PostCraft.
///
/// ARCHITECTURAL RULE: No other module may call the provider directly.
/// All LLM interactions MUST go through this module.
///
/// Wire contract: OpenAI-compatible `/chat/completions`. One request per call,
/// no retry, no backoff, no request timeout.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub mod extract;
pub mod prompts;
#[cfg(test)]
pub mod test_support;

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Model used for every post-generation variant, including image analysis.
pub const POST_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
/// Model used by the strategy assistant.
pub const CHAT_MODEL: &str = "llama-3.3-70b-versatile";

const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f32 = 0.35;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Groq API key is not configured. Please add GROQ_API_KEY to .env")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Groq API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Request was cancelled")]
    Cancelled,
}

// ────────────────────────────────────────────────────────────────────────────
// Message model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message. Content is either plain text or a list of parts
/// (used to attach an image next to the prompt text).
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message carrying prompt text plus an image given as a data URL.
    pub fn user_with_image(text: impl Into<String>, data_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: data_url.into(),
                    },
                },
            ]),
        }
    }
}

/// Per-call sampling options.
#[derive(Debug, Clone, Copy)]
pub struct CallOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services in PostCraft.
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, api_url: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            api_url: api_url.into(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends one chat-completion request and returns the first choice's text
    /// (empty when the provider returns no choices).
    ///
    /// Fails with `MissingApiKey` before touching the network when no key is
    /// configured, and with `Cancelled` as soon as `cancel` fires.
    pub async fn call(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: CallOptions,
        cancel: &CancellationToken,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        if cancel.is_cancelled() {
            return Err(LlmError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("LLM call cancelled (model: {model})");
                Err(LlmError::Cancelled)
            }
            result = self.send(api_key, model, messages, options) => result,
        }
    }

    async fn send(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
        options: CallOptions,
    ) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        debug!(
            model,
            messages = messages.len(),
            max_tokens = options.max_tokens,
            temperature = options.temperature,
            "sending LLM request"
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("LLM API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        debug!("LLM call succeeded: {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{client, keyless_client, spawn_provider};
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn test_text_message_serializes_as_string_content() {
        let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_image_message_serializes_as_parts() {
        let msg = ChatMessage::user_with_image("describe", "data:image/png;base64,AAAA");
        let value = serde_json::to_value(msg).unwrap();
        assert_eq!(value["content"][0], json!({"type": "text", "text": "describe"}));
        assert_eq!(
            value["content"][1],
            json!({"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}})
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Unroutable URL: a network attempt would surface as Http, not MissingApiKey.
        let llm = keyless_client();
        let err = llm
            .call(POST_MODEL, &[ChatMessage::user("x")], CallOptions::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_non_success_surfaces_provider_message() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "rate limited"}})),
                )
            }),
        );
        let llm = client(spawn_provider(router).await);

        let err = llm
            .call(POST_MODEL, &[ChatMessage::user("x")], CallOptions::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        match &err {
            LlmError::Api { status, message } => {
                assert_eq!(*status, 429);
                assert_eq!(message, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_unknown_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }),
        );
        let llm = client(spawn_provider(router).await);

        let err = llm
            .call(POST_MODEL, &[ChatMessage::user("x")], CallOptions::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 502, ref message } if message == "Unknown error"));
    }

    #[tokio::test]
    async fn test_success_returns_first_choice_and_sends_contract() {
        // Echo back the auth header and request shape so the test can inspect them.
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let echo = format!(
                    "{}|{}|{}|{}",
                    auth, body["model"], body["max_tokens"], body["messages"][0]["role"]
                );
                Json(json!({
                    "choices": [
                        {"message": {"content": echo}},
                        {"message": {"content": "second"}}
                    ]
                }))
            }),
        );
        let llm = client(spawn_provider(router).await);

        let text = llm
            .call(
                CHAT_MODEL,
                &[ChatMessage::system("sys"), ChatMessage::user("hello")],
                CallOptions { max_tokens: 512, temperature: 0.6 },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(text, "Bearer test-key|\"llama-3.3-70b-versatile\"|512|\"system\"");
    }

    #[tokio::test]
    async fn test_empty_choices_yields_empty_text() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let llm = client(spawn_provider(router).await);

        let text = llm
            .call(POST_MODEL, &[ChatMessage::user("x")], CallOptions::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_cancel_interrupts_in_flight_call() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                Json(json!({"choices": []}))
            }),
        );
        let llm = client(spawn_provider(router).await);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = llm
            .call(POST_MODEL, &[ChatMessage::user("x")], CallOptions::default(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Cancelled));
    }
}
