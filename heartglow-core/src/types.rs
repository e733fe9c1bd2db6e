//! Request and result types for message generation.

use serde::{Deserialize, Serialize};

/// Sub-mode of prompt assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Create a new message from scratch.
    Generate,
    /// Revise a previous message based on user feedback.
    Revise,
    /// Analyze an existing message instead of writing one.
    Analyze,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Generate => "generate",
            GenerationMode::Revise => "revise",
            GenerationMode::Analyze => "analyze",
        }
    }
}

/// A fully-specified message generation request.
///
/// Immutable once built: construct one via [`crate::draft::MessageDraft`]
/// or directly when all fields are already known (e.g. deserialized from an
/// API request). Optional fields that are absent must stay `None` rather
/// than holding empty strings, so prompt assembly can omit their clauses
/// entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Who the message is for (first name is enough).
    pub recipient_name: String,
    /// Relationship to the recipient (e.g. "Friend", "Partner", "Coworker").
    pub relationship: String,
    /// Communicative purpose (e.g. "gratitude", "apology", "check-in").
    pub intent: String,
    /// Free-text intent; takes priority over `intent` when present.
    #[serde(default)]
    pub custom_intent: Option<String>,
    /// Stylistic register (e.g. "warm", "casual", "formal").
    pub tone: String,
    /// Tone intensity on a 1-5 scale.
    pub tone_intensity: u8,
    /// Delivery format (e.g. "text", "letter", "email").
    pub format: String,
    /// Requested length (e.g. "brief", "medium", "detailed").
    pub format_length: String,
    /// Context the message should account for, omitted when empty.
    #[serde(default)]
    pub special_circumstances: Option<String>,
    /// An earlier draft the user wants reworked.
    #[serde(default)]
    pub previous_message: Option<String>,
    /// What the user wants changed about `previous_message`.
    #[serde(default)]
    pub user_feedback: Option<String>,
}

impl GenerationRequest {
    /// Which prompt sub-mode this request selects. Revision phrasing is used
    /// only when a previous message and feedback on it are both present.
    pub fn mode(&self) -> GenerationMode {
        if has_content(&self.previous_message) && has_content(&self.user_feedback) {
            GenerationMode::Revise
        } else {
            GenerationMode::Generate
        }
    }

    /// The effective intent wording: the custom free-text intent when given,
    /// otherwise the selected intent type.
    pub fn effective_intent(&self) -> &str {
        match &self.custom_intent {
            Some(custom) if !custom.trim().is_empty() => custom,
            _ => &self.intent,
        }
    }
}

/// The parsed outcome of one completion: the message itself plus the
/// explanatory insight bullets that followed the `INSIGHTS:` marker.
///
/// Produced once per request and never mutated afterwards. `insights` is
/// empty whenever the completion carried no marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub message: String,
    pub insights: Vec<String>,
}

/// True when an optional field holds non-whitespace content.
pub(crate) fn has_content(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
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
    fn test_mode_defaults_to_generate() {
        assert_eq!(base_request().mode(), GenerationMode::Generate);
    }

    #[test]
    fn test_mode_revise_requires_both_fields() {
        let mut request = base_request();
        request.previous_message = Some("Thanks for everything".to_string());
        assert_eq!(request.mode(), GenerationMode::Generate);

        request.user_feedback = Some("make it warmer".to_string());
        assert_eq!(request.mode(), GenerationMode::Revise);
    }

    #[test]
    fn test_mode_ignores_whitespace_feedback() {
        let mut request = base_request();
        request.previous_message = Some("Thanks".to_string());
        request.user_feedback = Some("   ".to_string());
        assert_eq!(request.mode(), GenerationMode::Generate);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_string(&base_request()).unwrap();
        assert!(json.contains("\"recipientName\""));
        assert!(json.contains("\"formatLength\""));

        let parsed: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, base_request());
    }

    #[test]
    fn test_effective_intent_prefers_custom() {
        let mut request = base_request();
        assert_eq!(request.effective_intent(), "gratitude");

        request.custom_intent = Some("congratulate them on the new job".to_string());
        assert_eq!(
            request.effective_intent(),
            "congratulate them on the new job"
        );

        request.custom_intent = Some("  ".to_string());
        assert_eq!(request.effective_intent(), "gratitude");
    }
}
