// Post Generation
// Implements: request parameters, prompt construction, model-output interpretation,
// engagement scoring, and copy text.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod generator;
pub mod handlers;
pub mod params;
pub mod prompts;
pub mod scoring;
