//! Message commands: drive the draft wizard against a running server.

use anyhow::Result;
use clap::Args;
use heartglow_core::{DraftStage, GenerationResult, MessageDraft};
use serde::Deserialize;

use crate::check;

#[derive(Args)]
pub struct GenerateArgs {
    /// Server URL (default: http://localhost:3000)
    #[arg(long, default_value = "http://localhost:3000")]
    pub server: String,
    /// Session token from signup or login
    #[arg(long)]
    pub token: String,
    /// Who the message is for
    #[arg(long)]
    pub recipient: String,
    /// Relationship to the recipient (e.g. "Friend")
    #[arg(long)]
    pub relationship: String,
    /// Purpose of the message (e.g. "gratitude", "apology")
    #[arg(long)]
    pub intent: String,
    /// Tone of the message (e.g. "warm", "casual")
    #[arg(long, default_value = "warm")]
    pub tone: String,
    /// Tone intensity, 1 (barely there) to 5 (as strong as it gets)
    #[arg(long, default_value_t = 3)]
    pub intensity: u8,
    /// Delivery format (e.g. "text", "letter")
    #[arg(long, default_value = "text")]
    pub format: String,
    /// Length of the message (e.g. "brief", "detailed")
    #[arg(long, default_value = "brief")]
    pub length: String,
    /// Extra context the message should account for
    #[arg(long)]
    pub circumstances: Option<String>,
}

#[derive(Deserialize)]
struct MessageItem {
    message: String,
    #[serde(rename = "recipientName")]
    recipient_name: String,
    #[serde(rename = "createdAt")]
    created_at: String,
}

#[derive(Deserialize)]
struct MessageListResponse {
    messages: Vec<MessageItem>,
}

pub async fn generate(args: GenerateArgs) -> Result<()> {
    // Walk the wizard the way a client would, so field problems surface
    // locally with the offending stage named instead of as a server 400.
    let mut draft = MessageDraft::new();
    draft.set_recipient(&args.recipient, &args.relationship);
    draft.set_intent(&args.intent);
    draft.set_tone(&args.tone, args.intensity);
    draft.set_format(&args.format, &args.length);
    if let Some(circumstances) = &args.circumstances {
        draft.set_special_circumstances(circumstances);
    }
    while draft.stage() != DraftStage::Ready {
        draft.advance()?;
    }
    let request = draft.finish()?;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/messages/generate", args.server))
        .bearer_auth(&args.token)
        .json(&request)
        .send()
        .await?;
    let result: GenerationResult = check(response).await?.json().await?;

    println!("{}", result.message);
    if !result.insights.is_empty() {
        println!();
        for insight in &result.insights {
            println!("- {}", insight);
        }
    }

    Ok(())
}

pub async fn history(server: &str, token: &str, limit: i64) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/messages?limit={}", server, limit))
        .bearer_auth(token)
        .send()
        .await?;
    let body: MessageListResponse = check(response).await?.json().await?;

    if body.messages.is_empty() {
        println!("No saved messages.");
        return Ok(());
    }
    for item in &body.messages {
        let first_line = item.message.lines().next().unwrap_or("");
        println!("{}  {}  {}", item.created_at, item.recipient_name, first_line);
    }

    Ok(())
}
