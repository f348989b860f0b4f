// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.
//
// Placeholders common to every template:
//   {word_count}, {optimize_line}, {optimize_flag}, {field}, {audience}, {theme},
//   {output_instruction}
// `{optimize_line}` and `{user_context_line}` occupy a whole line and are
// removed together with their newline when empty.

/// Generate-from-idea template. Extra placeholder: `{idea}`.
pub const SCRATCH_PROMPT_TEMPLATE: &str = r#"You are an expert at crafting LinkedIn posts from ideas.

INSTRUCTIONS:
- Extract the key message from the idea
- Create a professional, engaging LinkedIn post (under {word_count} words)
- Include 2-3 relevant hashtags
- Incorporate user context if provided
- Keep the tone professional yet engaging
{optimize_line}
- Metrics:
  - Target word count: {word_count}
  - Optimize for engagement: {optimize_flag}

INPUT:
- Idea: {idea}
- Field: {field}
- Audience: {audience}
- Goal: {theme}

{output_instruction}"#;

/// Rewrite template. Extra placeholder: `{content}`.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"You are an expert LinkedIn editor. Rewrite the content below to be more crisp, catchy, and compelling for LinkedIn readers.

INSTRUCTIONS:
- Extract the key message from the content
- Create a professional, engaging LinkedIn post (under {word_count} words)
- Include 2-3 relevant hashtags
- Incorporate user context if provided
- Keep the tone professional yet engaging
{optimize_line}
- Metrics:
  - Target word count: {word_count}
  - Optimize for engagement: {optimize_flag}

ORIGINAL CONTENT:
{content}

CONTEXT:
- Field: {field}
- Audience: {audience}
- Goal: {theme}

{output_instruction}"#;

/// Image template, sent as the text part next to the image. Extra placeholder:
/// `{user_context_line}`.
pub const IMAGE_PROMPT_TEMPLATE: &str = r#"You are an expert at extracting insights from images and crafting LinkedIn posts.

INSTRUCTIONS:
- Extract key insights or message from the image
- Create a professional, engaging LinkedIn post (under {word_count} words)
- Include 2-3 relevant hashtags
- Incorporate user context if provided
- Keep the tone professional yet engaging
{optimize_line}
- Metrics:
  - Target word count: {word_count}
  - Optimize for engagement: {optimize_flag}

INPUT:
- Image (please analyze)
{user_context_line}
- Field: {field}
- Audience: {audience}
- Goal: {theme}

{output_instruction}"#;
