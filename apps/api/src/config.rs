use anyhow::{Context, Result};

use crate::assistant::session::{DEFAULT_IDLE_TTL_MINUTES, DEFAULT_MAX_SESSIONS};
use crate::llm_client::GROQ_API_URL;

/// Application configuration loaded from environment variables.
///
/// The Groq key is optional at startup: without it the service still serves
/// scoring and option endpoints, and every remote call fails fast.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on live assistant sessions.
    pub max_sessions: usize,
    /// Minutes an assistant session may sit idle before it is dropped.
    pub session_idle_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: optional_env("GROQ_API_KEY"),
            groq_api_url: optional_env("GROQ_API_URL").unwrap_or_else(|| GROQ_API_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_sessions: match optional_env("SESSION_MAX") {
                Some(v) => v.parse().context("SESSION_MAX must be a positive integer")?,
                None => DEFAULT_MAX_SESSIONS,
            },
            session_idle_minutes: match optional_env("SESSION_IDLE_MINUTES") {
                Some(v) => v
                    .parse()
                    .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?,
                None => DEFAULT_IDLE_TTL_MINUTES,
            },
        })
    }
}

/// Reads an env var, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
