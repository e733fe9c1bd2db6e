pub mod ai;
pub mod completion_parser;
pub mod draft;
pub mod types;

pub use ai::{
    analyze_message, generate_message, AiConfig, AiError, ChatClient, ChatMessage, ChatRequest,
    ChatResponse, ConfigError, FakeChatClient, OpenAiClient, Role, Usage,
};
pub use completion_parser::{parse_completion, INSIGHTS_MARKER};
pub use draft::{DraftError, DraftStage, MessageDraft, DEFAULT_TONE_INTENSITY};
pub use types::{GenerationMode, GenerationRequest, GenerationResult};
