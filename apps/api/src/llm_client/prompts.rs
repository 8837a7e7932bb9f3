// Shared prompt fragments.
// Each feature that needs generation defines its own prompts.rs alongside it.

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON payload. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Tone guard appended to every psychology-facing prompt.
pub const CARE_INSTRUCTION: &str = "\
    Be warm, witty and insightful, never clinical or diagnostic. \
    Do not shame the user, and do not give medical or crisis advice.";
