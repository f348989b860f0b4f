// Strategy Assistant
// Implements: chat sessions held in memory, one awaited turn at a time, cancellable.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod session;
