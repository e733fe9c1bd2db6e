//! Prompt templates.

pub mod analyze;
pub mod generate;

pub use analyze::render_analyze_user_prompt;
pub use generate::render_user_prompt;

use crate::types::GenerationMode;

/// Persona text for the given sub-mode. Static by design: the system prompt
/// carries the coach framing, the user prompt carries everything request
/// specific.
pub fn render_system_prompt(mode: GenerationMode) -> &'static str {
    match mode {
        GenerationMode::Generate => generate::GENERATE_SYSTEM_PROMPT,
        GenerationMode::Revise => generate::REVISE_SYSTEM_PROMPT,
        GenerationMode::Analyze => analyze::ANALYZE_SYSTEM_PROMPT,
    }
}
