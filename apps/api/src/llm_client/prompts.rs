// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction appended to every prompt whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
You MUST respond with a single valid JSON object only. \
Do NOT include any text outside the JSON object. \
Do NOT use markdown code fences. \
Do NOT include explanations or apologies.";

/// Shared persona preamble for all pitch-coaching prompts.
pub const PITCH_EXPERT_PERSONA: &str = "\
You are an expert startup pitch analyzer with extensive experience in venture capital, \
startup fundraising, and pitch coaching.";
