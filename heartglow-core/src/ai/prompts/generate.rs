//! Message generation and revision prompts.

use crate::types::{GenerationMode, GenerationRequest};

/// Prompt name for log correlation.
pub const GENERATE_PROMPT_NAME: &str = "generate_message";

/// Persona for writing a new message.
pub const GENERATE_SYSTEM_PROMPT: &str = "You are a communication coach helping someone write a personal message. \
You write in plain, sincere language that sounds like a real person talking to someone they care about, \
never like a greeting card or a form letter. Match the tone the user asks for, respect the requested \
format and length, and never invent shared memories or facts the user did not provide.";

/// Persona for reworking an existing draft.
pub const REVISE_SYSTEM_PROMPT: &str = "You are a communication coach helping someone rework a message they already drafted. \
Stay faithful to what the original draft was trying to say, apply the user's feedback precisely, \
and keep the result sounding like a real person rather than a template. Never invent shared \
memories or facts the user did not provide.";

/// Fixed response-format directive appended to every user prompt, so the
/// completion can be split into message and insights downstream.
pub const RESPONSE_FORMAT_DIRECTIVE: &str = "Reply with the message text itself, then a line containing exactly INSIGHTS:, \
then 2-4 short bullet lines, each explaining one thing that makes the message effective. \
Do not add any other headings or commentary.";

/// Render the user prompt for a generation request.
///
/// Every provided field is interpolated verbatim; clauses for absent
/// optional fields are omitted entirely. Requests carrying both a previous
/// message and feedback get revision phrasing instead of creation phrasing.
pub fn render_user_prompt(request: &GenerationRequest) -> String {
    match request.mode() {
        GenerationMode::Revise => render_revise_prompt(request),
        _ => render_generate_prompt(request),
    }
}

fn render_generate_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Create a message to {recipient}, my {relationship}.\n\
         The purpose of the message is {intent}.\n\
         The tone should be {tone}, at intensity {intensity} on a scale of 1 to 5 ({descriptor}).\n\
         Write it as a {length} {format}.\n",
        recipient = request.recipient_name,
        relationship = request.relationship,
        intent = request.effective_intent(),
        tone = request.tone,
        intensity = request.tone_intensity,
        descriptor = intensity_descriptor(request.tone_intensity),
        length = request.format_length,
        format = request.format,
    );

    push_circumstances_clause(&mut prompt, request);
    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT_DIRECTIVE);
    prompt
}

fn render_revise_prompt(request: &GenerationRequest) -> String {
    // mode() only selects revision when both fields hold content.
    let previous = request.previous_message.as_deref().unwrap_or_default();
    let feedback = request.user_feedback.as_deref().unwrap_or_default();

    let mut prompt = format!(
        "I already have a draft message to {recipient}, my {relationship}, and I want it reworked.\n\
         \n\
         Here is the previous draft:\n\
         {previous}\n\
         \n\
         Revise the draft based on this feedback: {feedback}\n\
         \n\
         Keep the purpose ({intent}), the {tone} tone at intensity {intensity} on a scale of 1 to 5 \
         ({descriptor}), and the {length} {format} format.\n",
        recipient = request.recipient_name,
        relationship = request.relationship,
        previous = previous,
        feedback = feedback,
        intent = request.effective_intent(),
        tone = request.tone,
        intensity = request.tone_intensity,
        descriptor = intensity_descriptor(request.tone_intensity),
        length = request.format_length,
        format = request.format,
    );

    push_circumstances_clause(&mut prompt, request);
    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT_DIRECTIVE);
    prompt
}

/// Append the special-circumstances clause, or nothing at all when the
/// field is absent or blank. No empty placeholder text.
fn push_circumstances_clause(prompt: &mut String, request: &GenerationRequest) {
    if let Some(circumstances) = request.special_circumstances.as_deref() {
        if !circumstances.trim().is_empty() {
            prompt.push_str(&format!(
                "Special circumstances to keep in mind: {}.\n",
                circumstances.trim()
            ));
        }
    }
}

/// Wording for the 1-5 intensity scale. Out-of-range values clamp to the
/// nearest end rather than failing; prompt assembly never errors.
fn intensity_descriptor(intensity: u8) -> &'static str {
    match intensity {
        0 | 1 => "barely there",
        2 => "gentle",
        3 => "moderate",
        4 => "strong",
        _ => "as strong as it gets",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> GenerationRequest {
        GenerationRequest {
            recipient_name: "Sam".to_string(),
            relationship: "Friend".to_string(),
            intent: "gratitude".to_string(),
            custom_intent: None,
            tone: "warm".to_string(),
            tone_intensity: 3,
            format: "text".to_string(),
            format_length: "brief".to_string(),
            special_circumstances: None,
            previous_message: None,
            user_feedback: None,
        }
    }

    #[test]
    fn test_generate_prompt_contains_supplied_fields() {
        let prompt = render_user_prompt(&base_request());

        assert!(prompt.contains("Sam"));
        assert!(prompt.contains("Friend"));
        assert!(prompt.contains("gratitude"));
        assert!(prompt.contains("warm"));
        assert!(prompt.contains("intensity 3"));
        assert!(prompt.contains("brief"));
        assert!(prompt.contains("text"));
        assert!(prompt.contains("INSIGHTS:"));
        assert!(prompt.contains("Create a message"));
    }

    #[test]
    fn test_generate_prompt_omits_absent_circumstances() {
        let prompt = render_user_prompt(&base_request());
        assert!(!prompt.contains("Special circumstances"));

        let mut request = base_request();
        request.special_circumstances = Some("   ".to_string());
        let prompt = render_user_prompt(&request);
        assert!(!prompt.contains("Special circumstances"));
    }

    #[test]
    fn test_generate_prompt_includes_circumstances_when_present() {
        let mut request = base_request();
        request.special_circumstances = Some("we argued last week".to_string());
        let prompt = render_user_prompt(&request);
        assert!(prompt.contains("Special circumstances to keep in mind: we argued last week."));
    }

    #[test]
    fn test_custom_intent_takes_priority() {
        let mut request = base_request();
        request.intent = "custom".to_string();
        request.custom_intent = Some("congratulate them on the marathon".to_string());
        let prompt = render_user_prompt(&request);
        assert!(prompt.contains("congratulate them on the marathon"));
    }

    #[test]
    fn test_revision_phrasing_selected_when_feedback_present() {
        let mut request = base_request();
        request.previous_message = Some("Thanks for being there.".to_string());
        request.user_feedback = Some("mention the move specifically".to_string());

        let prompt = render_user_prompt(&request);

        assert!(!prompt.contains("Create a message"));
        assert!(prompt.contains("Revise the draft"));
        assert!(prompt.contains("Thanks for being there."));
        assert!(prompt.contains("mention the move specifically"));
        assert!(prompt.contains("INSIGHTS:"));
    }

    #[test]
    fn test_previous_message_alone_keeps_creation_phrasing() {
        let mut request = base_request();
        request.previous_message = Some("Thanks for being there.".to_string());
        let prompt = render_user_prompt(&request);
        assert!(prompt.contains("Create a message"));
    }

    #[test]
    fn test_intensity_descriptor_clamps() {
        assert_eq!(intensity_descriptor(0), intensity_descriptor(1));
        assert_eq!(intensity_descriptor(9), intensity_descriptor(5));
    }
}
