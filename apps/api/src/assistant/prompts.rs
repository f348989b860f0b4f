// Prompt constants for the strategy assistant.

/// System prompt prepended to every assistant conversation.
pub const ASSISTANT_SYSTEM: &str = "You are PostCraft AI Assistant, an expert in LinkedIn content strategy, \
    copywriting, and social media marketing. Help users refine posts, answer strategy questions, \
    and optimize content for engagement. Be concise (under 200 words), professional, and actionable. \
    Provide specific examples when helpful.";

/// First entry of every new session.
pub const GREETING: &str = "Hello! I'm your PostCraft AI Assistant. I can help you refine your posts, \
    answer questions about content strategy, and provide engagement insights. How can I help you today?";

/// One-click starter questions offered next to the chat.
pub const QUICK_QUESTIONS: &[&str] = &[
    "How can I improve my post?",
    "What's the best time to post?",
    "Can you suggest a catchy headline?",
    "How do I grow my audience?",
];
