//! Message analysis prompts.

/// Prompt name for log correlation.
pub const ANALYZE_PROMPT_NAME: &str = "analyze_message";

/// Persona for reviewing a message the user already wrote.
pub const ANALYZE_SYSTEM_PROMPT: &str = "You are a communication coach reviewing a message someone has written. \
You point out what lands well, what could read wrong on the receiving end, and how the message \
could better serve its purpose. Be concrete and kind, and never rewrite the sender's voice out \
of the message.";

/// Render the analysis user prompt. The relationship clause is omitted when
/// not provided.
pub fn render_analyze_user_prompt(message: &str, relationship: Option<&str>) -> String {
    let recipient_clause = match relationship {
        Some(relationship) if !relationship.trim().is_empty() => {
            format!(" to my {}", relationship.trim())
        }
        _ => String::new(),
    };

    format!(
        "Review this message I am planning to send{recipient_clause}:\n\
         \n\
         {message}\n\
         \n\
         Tell me how it is likely to land on the receiving end and what would make it stronger.\n\
         \n\
         Reply with a short overall assessment, then a line containing exactly INSIGHTS:, \
         then 2-4 short bullet lines, each naming one concrete observation or improvement. \
         Do not add any other headings or commentary.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_relationship() {
        let prompt = render_analyze_user_prompt("Sorry I missed your call.", Some("Sister"));
        assert!(prompt.contains("to my Sister"));
        assert!(prompt.contains("Sorry I missed your call."));
        assert!(prompt.contains("INSIGHTS:"));
    }

    #[test]
    fn test_render_without_relationship() {
        let prompt = render_analyze_user_prompt("Sorry I missed your call.", None);
        assert!(!prompt.contains("to my"));
        assert!(prompt.contains("Sorry I missed your call."));
    }
}
