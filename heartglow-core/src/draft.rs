//! Draft accumulation for the message wizard.
//!
//! The client collects a generation request over several screens. Instead
//! of scattered per-screen state, the whole flow is one explicit state
//! machine: named stages, a single accumulator, and one exit point that
//! produces the immutable [`GenerationRequest`].

use thiserror::Error;

use crate::types::GenerationRequest;

/// Default tone intensity when the user never touches the slider.
pub const DEFAULT_TONE_INTENSITY: u8 = 3;

/// Stages of the message wizard, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DraftStage {
    #[default]
    Recipient,
    Intent,
    Tone,
    Format,
    Extras,
    Ready,
}

impl DraftStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStage::Recipient => "recipient",
            DraftStage::Intent => "intent",
            DraftStage::Tone => "tone",
            DraftStage::Format => "format",
            DraftStage::Extras => "extras",
            DraftStage::Ready => "ready",
        }
    }

    fn next(self) -> DraftStage {
        match self {
            DraftStage::Recipient => DraftStage::Intent,
            DraftStage::Intent => DraftStage::Tone,
            DraftStage::Tone => DraftStage::Format,
            DraftStage::Format => DraftStage::Extras,
            DraftStage::Extras | DraftStage::Ready => DraftStage::Ready,
        }
    }

    fn previous(self) -> DraftStage {
        match self {
            DraftStage::Recipient | DraftStage::Intent => DraftStage::Recipient,
            DraftStage::Tone => DraftStage::Intent,
            DraftStage::Format => DraftStage::Tone,
            DraftStage::Extras => DraftStage::Format,
            DraftStage::Ready => DraftStage::Extras,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Missing {field} at the {stage} stage")]
    MissingField {
        stage: &'static str,
        field: &'static str,
    },

    #[error("Tone intensity must be between 1 and 5, got {0}")]
    InvalidIntensity(u8),

    #[error("Draft is not ready yet (currently at the {0} stage)")]
    NotReady(&'static str),
}

/// Accumulator for an in-progress generation request.
///
/// Fields can be set in any order; [`MessageDraft::advance`] gates stage
/// progression on the current stage's required fields, and
/// [`MessageDraft::finish`] re-validates everything before handing out the
/// request, so a draft can never leak a half-filled request.
#[derive(Debug, Clone, Default)]
pub struct MessageDraft {
    stage: DraftStage,
    recipient_name: Option<String>,
    relationship: Option<String>,
    intent: Option<String>,
    custom_intent: Option<String>,
    tone: Option<String>,
    tone_intensity: Option<u8>,
    format: Option<String>,
    format_length: Option<String>,
    special_circumstances: Option<String>,
    previous_message: Option<String>,
    user_feedback: Option<String>,
}

impl MessageDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> DraftStage {
        self.stage
    }

    pub fn set_recipient(&mut self, name: impl Into<String>, relationship: impl Into<String>) {
        self.recipient_name = Some(name.into());
        self.relationship = Some(relationship.into());
    }

    pub fn set_intent(&mut self, intent: impl Into<String>) {
        self.intent = Some(intent.into());
    }

    pub fn set_custom_intent(&mut self, text: impl Into<String>) {
        self.custom_intent = Some(text.into());
    }

    pub fn set_tone(&mut self, tone: impl Into<String>, intensity: u8) {
        self.tone = Some(tone.into());
        self.tone_intensity = Some(intensity);
    }

    pub fn set_format(&mut self, format: impl Into<String>, length: impl Into<String>) {
        self.format = Some(format.into());
        self.format_length = Some(length.into());
    }

    pub fn set_special_circumstances(&mut self, text: impl Into<String>) {
        self.special_circumstances = Some(text.into());
    }

    /// Record a previous draft and the feedback on it, switching the
    /// eventual request into revision mode.
    pub fn set_revision(&mut self, previous: impl Into<String>, feedback: impl Into<String>) {
        self.previous_message = Some(previous.into());
        self.user_feedback = Some(feedback.into());
    }

    /// Validate the current stage and move to the next one. The stage is
    /// left unchanged when validation fails. Advancing from Ready is a
    /// no-op.
    pub fn advance(&mut self) -> Result<DraftStage, DraftError> {
        self.validate_stage(self.stage)?;
        self.stage = self.stage.next();
        Ok(self.stage)
    }

    /// Move back one stage, never failing; backing up from the first stage
    /// stays there. Already-entered fields are kept.
    pub fn back(&mut self) -> DraftStage {
        self.stage = self.stage.previous();
        self.stage
    }

    /// Produce the immutable request. Only valid from Ready; every
    /// required field is re-checked so the result is complete by
    /// construction.
    pub fn finish(&self) -> Result<GenerationRequest, DraftError> {
        if self.stage != DraftStage::Ready {
            return Err(DraftError::NotReady(self.stage.as_str()));
        }

        let recipient_name = required(&self.recipient_name, "recipient", "recipient_name")?;
        let relationship = required(&self.relationship, "recipient", "relationship")?;

        // A draft with only a free-text intent records "custom" as its
        // intent type, matching how the selector behaves.
        let custom_intent = clean(&self.custom_intent);
        let intent = match (clean(&self.intent), &custom_intent) {
            (Some(intent), _) => intent,
            (None, Some(_)) => "custom".to_string(),
            (None, None) => {
                return Err(DraftError::MissingField {
                    stage: "intent",
                    field: "intent",
                })
            }
        };

        let tone = required(&self.tone, "tone", "tone")?;
        let tone_intensity = self.tone_intensity.unwrap_or(DEFAULT_TONE_INTENSITY);
        if !(1..=5).contains(&tone_intensity) {
            return Err(DraftError::InvalidIntensity(tone_intensity));
        }

        let format = required(&self.format, "format", "format")?;
        let format_length = required(&self.format_length, "format", "format_length")?;

        Ok(GenerationRequest {
            recipient_name,
            relationship,
            intent,
            custom_intent,
            tone,
            tone_intensity,
            format,
            format_length,
            special_circumstances: clean(&self.special_circumstances),
            previous_message: clean(&self.previous_message),
            user_feedback: clean(&self.user_feedback),
        })
    }

    fn validate_stage(&self, stage: DraftStage) -> Result<(), DraftError> {
        match stage {
            DraftStage::Recipient => {
                required(&self.recipient_name, "recipient", "recipient_name")?;
                required(&self.relationship, "recipient", "relationship")?;
            }
            DraftStage::Intent => {
                if clean(&self.intent).is_none() && clean(&self.custom_intent).is_none() {
                    return Err(DraftError::MissingField {
                        stage: "intent",
                        field: "intent",
                    });
                }
            }
            DraftStage::Tone => {
                required(&self.tone, "tone", "tone")?;
                if let Some(intensity) = self.tone_intensity {
                    if !(1..=5).contains(&intensity) {
                        return Err(DraftError::InvalidIntensity(intensity));
                    }
                }
            }
            DraftStage::Format => {
                required(&self.format, "format", "format")?;
                required(&self.format_length, "format", "format_length")?;
            }
            DraftStage::Extras | DraftStage::Ready => {}
        }
        Ok(())
    }
}

/// A required field's trimmed value, or the stage-specific error.
fn required(
    field: &Option<String>,
    stage: &'static str,
    name: &'static str,
) -> Result<String, DraftError> {
    clean(field).ok_or(DraftError::MissingField { stage, field: name })
}

/// Normalize an optional field: absent or blank becomes `None`.
fn clean(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
