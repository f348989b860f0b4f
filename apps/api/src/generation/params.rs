//! Generation request parameters and the option catalogs offered to the UI.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const FIELDS: &[&str] = &[
    "Money Exchange",
    "Forex Currencies",
    "Travels & Tourism",
    "Marketing",
    "Technology",
    "Business",
    "Motivation",
    "Finance",
];

pub const AUDIENCES: &[&str] = &["Professionals", "Members", "Founders", "Students", "Executives"];

pub const THEMES: &[&str] = &["Inform", "Motivate", "Engage", "Promote", "Inspire"];

pub const WORD_COUNTS: &[u32] = &[50, 100, 200];

const MAX_WORD_COUNT: u32 = 1000;

/// Audience and style parameters shared by every generation mode.
/// Catalog values are suggestions; any non-blank string is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostParams {
    pub field: String,
    pub audience: String,
    pub theme: String,
    pub word_count: u32,
    pub optimize: bool,
}

impl Default for PostParams {
    fn default() -> Self {
        Self {
            field: "Marketing".to_string(),
            audience: "Professionals".to_string(),
            theme: "Inform".to_string(),
            word_count: 100,
            optimize: true,
        }
    }
}

impl PostParams {
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("field", &self.field),
            ("audience", &self.audience),
            ("theme", &self.theme),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{name} cannot be empty")));
            }
        }
        if !(1..=MAX_WORD_COUNT).contains(&self.word_count) {
            return Err(AppError::Validation(format!(
                "word_count must be between 1 and {MAX_WORD_COUNT}"
            )));
        }
        Ok(())
    }
}

/// What the post is generated from. Tagged by `mode` on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GenerationSource {
    /// A raw idea to expand into a post.
    Scratch { idea: String },
    /// Existing copy to rewrite.
    Rewrite { content: String },
    /// An image as a `data:image/...;base64,` URL, with optional extra context.
    Image {
        image: String,
        #[serde(default)]
        prompt: Option<String>,
    },
}

impl GenerationSource {
    pub fn mode(&self) -> &'static str {
        match self {
            GenerationSource::Scratch { .. } => "scratch",
            GenerationSource::Rewrite { .. } => "rewrite",
            GenerationSource::Image { .. } => "image",
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            GenerationSource::Scratch { idea } if idea.trim().is_empty() => Err(
                AppError::Validation("Please enter content to generate from.".to_string()),
            ),
            GenerationSource::Rewrite { content } if content.trim().is_empty() => Err(
                AppError::Validation("Please paste existing content to rewrite.".to_string()),
            ),
            GenerationSource::Image { image, .. } => validate_image_data_url(image),
            _ => Ok(()),
        }
    }
}

/// Request body for `POST /api/v1/posts/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub source: GenerationSource,
    #[serde(flatten)]
    pub params: PostParams,
}

/// Option catalogs and defaults returned by `GET /api/v1/posts/options`.
#[derive(Debug, Serialize)]
pub struct PostOptions {
    pub fields: &'static [&'static str],
    pub audiences: &'static [&'static str],
    pub themes: &'static [&'static str],
    pub word_counts: &'static [u32],
    pub defaults: PostParams,
}

impl PostOptions {
    pub fn catalog() -> Self {
        Self {
            fields: FIELDS,
            audiences: AUDIENCES,
            themes: THEMES,
            word_counts: WORD_COUNTS,
            defaults: PostParams::default(),
        }
    }
}

/// Accepts only `data:image/<subtype>;base64,<payload>` with a non-empty,
/// decodable payload.
pub fn validate_image_data_url(url: &str) -> Result<(), AppError> {
    if url.trim().is_empty() {
        return Err(AppError::Validation(
            "Please select an image to analyze.".to_string(),
        ));
    }

    let invalid = || AppError::Validation("Please select a valid image file.".to_string());

    let rest = url.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (subtype, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;
    if subtype.is_empty() || payload.is_empty() {
        return Err(invalid());
    }

    STANDARD.decode(payload).map_err(|_| invalid())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_form_defaults() {
        let p = PostParams::default();
        assert_eq!(p.field, "Marketing");
        assert_eq!(p.audience, "Professionals");
        assert_eq!(p.theme, "Inform");
        assert_eq!(p.word_count, 100);
        assert!(p.optimize);
    }

    #[test]
    fn test_request_flattens_mode_and_params() {
        let req: GenerateRequest = serde_json::from_value(json!({
            "mode": "rewrite",
            "content": "old copy",
            "theme": "Promote",
            "word_count": 50
        }))
        .unwrap();

        assert!(matches!(req.source, GenerationSource::Rewrite { ref content } if content == "old copy"));
        assert_eq!(req.params.theme, "Promote");
        assert_eq!(req.params.word_count, 50);
        // Unspecified params fall back to defaults.
        assert_eq!(req.params.field, "Marketing");
        assert!(req.params.optimize);
    }

    #[test]
    fn test_image_prompt_is_optional() {
        let req: GenerateRequest = serde_json::from_value(json!({
            "mode": "image",
            "image": "data:image/png;base64,iVBORw0KGgo="
        }))
        .unwrap();
        assert!(matches!(req.source, GenerationSource::Image { prompt: None, .. }));
        assert_eq!(req.source.mode(), "image");
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result: Result<GenerateRequest, _> =
            serde_json::from_value(json!({"mode": "video", "url": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_sources_fail_validation() {
        let scratch = GenerationSource::Scratch { idea: "  ".into() };
        let rewrite = GenerationSource::Rewrite { content: "".into() };
        assert!(matches!(scratch.validate(), Err(AppError::Validation(m)) if m.contains("generate from")));
        assert!(matches!(rewrite.validate(), Err(AppError::Validation(m)) if m.contains("rewrite")));
    }

    #[test]
    fn test_params_validation() {
        assert!(PostParams::default().validate().is_ok());

        let zero_words = PostParams { word_count: 0, ..PostParams::default() };
        assert!(zero_words.validate().is_err());

        let blank_field = PostParams { field: " ".into(), ..PostParams::default() };
        assert!(matches!(blank_field.validate(), Err(AppError::Validation(m)) if m.contains("field")));
    }

    #[test]
    fn test_image_data_url_validation() {
        assert!(validate_image_data_url("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(validate_image_data_url("").is_err());
        assert!(validate_image_data_url("data:text/plain;base64,aGk=").is_err());
        assert!(validate_image_data_url("data:image/png,raw").is_err());
        assert!(validate_image_data_url("data:image/png;base64,").is_err());
        assert!(validate_image_data_url("data:image/png;base64,***").is_err());
    }

    #[test]
    fn test_catalog_contains_defaults() {
        let options = PostOptions::catalog();
        assert!(options.fields.contains(&options.defaults.field.as_str()));
        assert!(options.audiences.contains(&options.defaults.audience.as_str()));
        assert!(options.themes.contains(&options.defaults.theme.as_str()));
        assert!(options.word_counts.contains(&options.defaults.word_count));
    }
}
