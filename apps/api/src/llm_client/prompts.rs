// Cross-cutting prompt fragments shared by every inference call.
// Task-specific templates live next to the module that uses them.

/// System prompt that asks for JSON-only output.
/// The response validator still tolerates code fences, since models ignore this at times.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
