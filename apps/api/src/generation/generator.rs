//! Post Generation — orchestrates a single generation request.
//!
//! Flow: validate → build prompt → one LLM call → tolerant JSON extraction →
//!       Structured / Unstructured content → engagement score → response.
//!
//! Unparseable model output is not an error: it degrades to `Unstructured`
//! and the raw text is scored and returned as-is.

use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::generation::params::{GenerateRequest, GenerationSource, PostParams};
use crate::generation::prompts::{
    IMAGE_PROMPT_TEMPLATE, REWRITE_PROMPT_TEMPLATE, SCRATCH_PROMPT_TEMPLATE,
};
use crate::generation::scoring::{engagement_score, ScoreBand};
use crate::llm_client::extract::extract_json_object;
use crate::llm_client::prompts::{yes_no, ENGAGEMENT_INSTRUCTION, POST_JSON_OUTPUT_INSTRUCTION};
use crate::llm_client::{CallOptions, ChatMessage, LlmClient, POST_MODEL};

const POST_MAX_TOKENS: u32 = 512;
const SCRATCH_TEMPERATURE: f32 = 0.28;
const REWRITE_TEMPERATURE: f32 = 0.3;
const IMAGE_TEMPERATURE: f32 = 0.28;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Model output after interpretation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostContent {
    /// The response contained a JSON object with the expected keys.
    Structured {
        headline: String,
        post: String,
        hashtags: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        extracted_text: Option<String>,
    },
    /// No JSON object could be read; the raw text is the post.
    Unstructured { raw_text: String },
}

/// Response of the generation pipeline, ready for preview and copy.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPost {
    pub mode: &'static str,
    pub content: PostContent,
    /// The text shown as the post and used for scoring.
    pub text: String,
    pub headline: String,
    pub hashtags: Vec<String>,
    pub score: u8,
    pub band: ScoreBand,
    pub copy_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Validates the request, makes one LLM call and interprets the result.
pub async fn generate_post(
    llm: &LlmClient,
    request: GenerateRequest,
    cancel: &CancellationToken,
) -> Result<GeneratedPost, AppError> {
    request.params.validate()?;
    request.source.validate()?;

    let mode = request.source.mode();
    info!(
        "Generating post (mode: {mode}, field: {}, audience: {}, words: {})",
        request.params.field, request.params.audience, request.params.word_count
    );

    let messages = build_messages(&request.source, &request.params);
    let raw = llm
        .call(POST_MODEL, &messages, call_options(&request.source), cancel)
        .await?;
    debug!("Raw generation output: {} chars", raw.len());

    let content = interpret_response(&raw);
    if matches!(content, PostContent::Unstructured { .. }) {
        warn!("Model output for {mode} post had no JSON object; returning raw text");
    }

    let post = finalize(mode, content);
    info!("Generated {mode} post: score {}/100 ({:?})", post.score, post.band);
    Ok(post)
}

fn call_options(source: &GenerationSource) -> CallOptions {
    let temperature = match source {
        GenerationSource::Scratch { .. } => SCRATCH_TEMPERATURE,
        GenerationSource::Rewrite { .. } => REWRITE_TEMPERATURE,
        GenerationSource::Image { .. } => IMAGE_TEMPERATURE,
    };
    CallOptions {
        max_tokens: POST_MAX_TOKENS,
        temperature,
    }
}

/// Builds the single user message for `source`. Image requests carry the
/// prompt and the data URL as a multi-part message.
pub fn build_messages(source: &GenerationSource, params: &PostParams) -> Vec<ChatMessage> {
    let prompt = build_prompt(source, params);
    match source {
        GenerationSource::Image { image, .. } => {
            vec![ChatMessage::user_with_image(prompt, image.clone())]
        }
        _ => vec![ChatMessage::user(prompt)],
    }
}

/// Fills the template for `source` with the request parameters.
pub fn build_prompt(source: &GenerationSource, params: &PostParams) -> String {
    let word_count = params.word_count.to_string();
    let optimize_line = params.optimize.then_some(ENGAGEMENT_INSTRUCTION);
    let context_line = match source {
        GenerationSource::Image { prompt, .. } => prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("- User context: {p}")),
        _ => None,
    };
    let mut values = vec![
        ("word_count", word_count.as_str()),
        ("optimize_flag", yes_no(params.optimize)),
        ("output_instruction", POST_JSON_OUTPUT_INSTRUCTION),
        ("field", params.field.as_str()),
        ("audience", params.audience.as_str()),
        ("theme", params.theme.as_str()),
    ];

    let template = match source {
        GenerationSource::Scratch { idea } => {
            values.push(("idea", idea.as_str()));
            drop_empty_line(SCRATCH_PROMPT_TEMPLATE, "optimize_line", optimize_line)
        }
        GenerationSource::Rewrite { content } => {
            values.push(("content", content.as_str()));
            drop_empty_line(REWRITE_PROMPT_TEMPLATE, "optimize_line", optimize_line)
        }
        GenerationSource::Image { .. } => {
            let template = drop_empty_line(IMAGE_PROMPT_TEMPLATE, "optimize_line", optimize_line);
            drop_empty_line(&template, "user_context_line", context_line.as_deref())
        }
    };
    if let Some(line) = optimize_line {
        values.push(("optimize_line", line));
    }
    if let Some(line) = &context_line {
        values.push(("user_context_line", line.as_str()));
    }

    substitute(&template, &values)
}

/// Removes a whole-line `{name}` placeholder, with its newline, when `value` is `None`.
fn drop_empty_line(template: &str, name: &str, value: Option<&str>) -> String {
    match value {
        Some(_) => template.to_string(),
        None => template.replace(&format!("{{{name}}}\n"), ""),
    }
}

/// Replaces every `{name}` with its value in a single left-to-right pass.
/// Substituted text is never rescanned, so braces in user input stay literal.
/// Unknown placeholders are left as they are.
fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Interpretation
// ────────────────────────────────────────────────────────────────────────────

/// Reads raw model output as `Structured` when a JSON object can be extracted,
/// otherwise as `Unstructured`.
pub fn interpret_response(raw: &str) -> PostContent {
    match extract_json_object(raw) {
        Some(obj) => structured_from_object(&obj),
        None => PostContent::Unstructured {
            raw_text: raw.to_string(),
        },
    }
}

fn structured_from_object(obj: &Map<String, Value>) -> PostContent {
    let string_field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

    let hashtags = obj
        .get("hashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .filter_map(normalize_hashtag)
                .collect()
        })
        .unwrap_or_default();

    PostContent::Structured {
        headline: string_field("headline").unwrap_or_default(),
        post: string_field("post")
            .map(|p| p.trim().to_string())
            .unwrap_or_default(),
        hashtags,
        extracted_text: string_field("extractedText").filter(|t| !t.trim().is_empty()),
    }
}

/// Trims a hashtag and prefixes `#` when missing. Blank tags are dropped.
pub fn normalize_hashtag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() || tag == "#" {
        return None;
    }
    Some(if tag.starts_with('#') {
        tag.to_string()
    } else {
        format!("#{tag}")
    })
}

/// Post text followed by a blank line and the hashtags, when there are any.
pub fn copy_text(text: &str, hashtags: &[String]) -> String {
    if hashtags.is_empty() {
        text.to_string()
    } else {
        format!("{text}\n\n{}", hashtags.join(" "))
    }
}

fn finalize(mode: &'static str, content: PostContent) -> GeneratedPost {
    let (text, headline, hashtags) = match &content {
        PostContent::Structured {
            headline,
            post,
            hashtags,
            ..
        } => (post.clone(), headline.clone(), hashtags.clone()),
        PostContent::Unstructured { raw_text } => (raw_text.clone(), String::new(), Vec::new()),
    };

    let score = engagement_score(&text);
    GeneratedPost {
        mode,
        copy_text: copy_text(&text, &hashtags),
        content,
        text,
        headline,
        hashtags,
        score,
        band: ScoreBand::from_score(score),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
