// Shared prompt fragments and the prompt composition used by every
// generation call. Each generation flow keeps its own templates in
// generation/prompts.rs.

/// Appended to every composed prompt, on top of the JSON response mode.
pub const JSON_ONLY_SUFFIX: &str = "Please respond with valid JSON only.";

/// Builds the full prompt: system instruction, request-specific instruction,
/// then the JSON-only suffix, separated by blank lines.
pub fn compose_prompt(system: &str, user: &str) -> String {
    format!("{system}\n\n{user}\n\n{JSON_ONLY_SUFFIX}")
}
