//! Engagement scoring — a deterministic 0–100 heuristic over post text.
//!
//! Thresholds and term lists are tuning values carried over unchanged from the
//! web client; keep them verbatim so scores stay comparable.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const BASE_SCORE: u32 = 45;
const MAX_SCORE: u32 = 100;

const CALL_TO_ACTION_TERMS: &[&str] = &[
    "connect",
    "share",
    "comment",
    "discuss",
    "learn",
    "discover",
    "join",
    "reach out",
    "let me know",
    "thoughts",
];

const STRONG_VERB_TERMS: &[&str] = &[
    "transform",
    "revolutionize",
    "discover",
    "unlock",
    "empower",
    "leverage",
    "accelerate",
    "scale",
];

const EMOJI_RANGE: std::ops::RangeInclusive<char> = '\u{1F300}'..='\u{1F9FF}';

fn numeric_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[0-9]+%|[0-9]+x|#[0-9]+|[0-9]+,[0-9]+").expect("static numeric pattern")
    })
}

/// Qualitative label shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 75 {
            ScoreBand::Excellent
        } else if score >= 50 {
            ScoreBand::Good
        } else {
            ScoreBand::Fair
        }
    }
}

/// Scores `text` for likely engagement. Empty text scores 0.
///
/// Base 45, then:
/// - word count 50–150: +20, else 30–200: +10
/// - any call-to-action term: +15
/// - `?` marks: +5 each, at most +15
/// - more than two line breaks: +10
/// - any emoji in U+1F300..U+1F9FF: +5
/// - numbers as `40%`, `3x`, `#1` or `1,000`: +10
/// - any strong verb: +10
///
/// The total is capped at 100.
pub fn engagement_score(text: &str) -> u8 {
    if text.is_empty() {
        return 0;
    }

    let lower = text.to_lowercase();
    let mut score = BASE_SCORE;

    let words = word_count(text);
    if (50..=150).contains(&words) {
        score += 20;
    } else if (30..=200).contains(&words) {
        score += 10;
    }

    if contains_any(&lower, CALL_TO_ACTION_TERMS) {
        score += 15;
    }

    let questions = text.matches('?').count().min(3) as u32;
    score += questions * 5;

    if text.matches('\n').count() > 2 {
        score += 10;
    }

    if text.chars().any(|c| EMOJI_RANGE.contains(&c)) {
        score += 5;
    }

    if numeric_pattern().is_match(text) {
        score += 10;
    }

    if contains_any(&lower, STRONG_VERB_TERMS) {
        score += 10;
    }

    score.min(MAX_SCORE) as u8
}

/// Number of pieces produced by splitting on whitespace runs. Leading or
/// trailing whitespace yields an empty piece, which is counted.
fn word_count(text: &str) -> usize {
    let mut pieces = 1;
    let mut in_space = false;
    for c in text.chars() {
        if is_separator(c) {
            if !in_space {
                pieces += 1;
                in_space = true;
            }
        } else {
            in_space = false;
        }
    }
    pieces
}

/// The web client's whitespace class: ASCII whitespace, U+FEFF and the Unicode
/// space separators. Unlike `char::is_whitespace`, U+0085 is not included.
fn is_separator(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{000B}' | '\u{000C}' | '\r' | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| haystack.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `n` neutral words that trigger no other bonus.
    fn filler(n: usize) -> String {
        vec!["alpha"; n].join(" ")
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(engagement_score(""), 0);
    }

    #[test]
    fn test_short_neutral_text_is_base() {
        assert_eq!(engagement_score("hello world"), 45);
    }

    #[test]
    fn test_word_count_sweet_spot_adds_20() {
        assert_eq!(engagement_score(&filler(50)), 65);
        assert_eq!(engagement_score(&filler(100)), 65);
        assert_eq!(engagement_score(&filler(150)), 65);
    }

    #[test]
    fn test_word_count_outer_band_adds_10() {
        assert_eq!(engagement_score(&filler(30)), 55);
        assert_eq!(engagement_score(&filler(49)), 55);
        assert_eq!(engagement_score(&filler(151)), 55);
        assert_eq!(engagement_score(&filler(200)), 55);
        assert_eq!(engagement_score(&filler(201)), 45);
        assert_eq!(engagement_score(&filler(29)), 45);
    }

    #[test]
    fn test_edge_whitespace_counts_as_a_piece() {
        // 49 words plus a trailing space: 50 pieces.
        assert_eq!(engagement_score(&format!("{} ", filler(49))), 65);
    }

    #[test]
    fn test_call_to_action_is_case_insensitive() {
        assert_eq!(engagement_score("Please SHARE this"), 60);
        assert_eq!(engagement_score("reach out anytime"), 60);
    }

    #[test]
    fn test_questions_capped_at_15() {
        assert_eq!(engagement_score("why"), 45);
        assert_eq!(engagement_score("why?"), 50);
        assert_eq!(engagement_score("why? how?"), 55);
        assert_eq!(engagement_score("a? b? c? d? e?"), 60);
    }

    #[test]
    fn test_line_breaks_need_more_than_two() {
        assert_eq!(engagement_score("a\nb\nc"), 45);
        assert_eq!(engagement_score("a\nb\nc\nd"), 55);
    }

    #[test]
    fn test_emoji_in_range() {
        assert_eq!(engagement_score("launch day \u{1F680}"), 50);
        // U+2764 (heart) is outside the range.
        assert_eq!(engagement_score("love it \u{2764}"), 45);
    }

    #[test]
    fn test_numeric_patterns() {
        assert_eq!(engagement_score("up 40%"), 55);
        assert_eq!(engagement_score("a 3X gain"), 55);
        assert_eq!(engagement_score("ranked #1"), 55);
        assert_eq!(engagement_score("1,000 users"), 55);
        assert_eq!(engagement_score("1000 users"), 45);
    }

    #[test]
    fn test_numeric_patterns_are_ascii_only() {
        // Arabic-Indic and full-width digits.
        assert_eq!(engagement_score("grew \u{0664}\u{0660}%"), 45);
        assert_eq!(engagement_score("grew \u{FF14}\u{FF10}%"), 45);
    }

    #[test]
    fn test_word_separators_follow_web_client() {
        // U+0085 does not split words; U+FEFF and U+3000 do.
        assert_eq!(engagement_score(&vec!["alpha"; 50].join("\u{0085}")), 45);
        assert_eq!(engagement_score(&vec!["alpha"; 50].join("\u{FEFF}")), 65);
        assert_eq!(engagement_score(&vec!["alpha"; 50].join("\u{3000}")), 65);
    }

    #[test]
    fn test_many_questions_stay_capped() {
        assert_eq!(engagement_score(&"?".repeat(10_000)), 60);
    }

    #[test]
    fn test_strong_verbs() {
        assert_eq!(engagement_score("We Accelerate teams"), 55);
    }

    #[test]
    fn test_discover_counts_as_cta_and_verb() {
        assert_eq!(engagement_score("discover"), 70);
    }

    #[test]
    fn test_growth_example_scores_at_least_60() {
        let score = engagement_score("Great news! We grew 40% this quarter. Thoughts?");
        // base 45 + numeric 10 + question 5 + "thoughts" CTA 15
        assert!(score >= 60);
        assert_eq!(score, 75);
    }

    #[test]
    fn test_score_capped_at_100() {
        let text = format!(
            "Transform your team \u{1F680}\nShare your thoughts?\nWhy? How?\nWe grew 40%\n{}",
            filler(60)
        );
        assert_eq!(engagement_score(&text), 100);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(75), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(74), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Fair);
    }
}
