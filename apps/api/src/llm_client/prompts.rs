// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Closing instruction shared by every post-generation prompt. The keys listed
/// here are what `extract::extract_json_object` expects to find.
pub const POST_JSON_OUTPUT_INSTRUCTION: &str =
    "OUTPUT: Return ONLY valid JSON with these keys: extractedText, headline, post, hashtags (array).";

/// Extra instruction line added when the user asks to optimize for engagement.
pub const ENGAGEMENT_INSTRUCTION: &str = "- Optimize for engagement: include a strong call-to-action, \
    use questions to drive comments, and use line breaks for readability.";

/// Renders a boolean the way the prompts present it to the model.
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
