use tracing::info;

use crate::error::Result;
use crate::llm::{build_chat_prompt, GeminiClient, GenerateRequest, Part, Usage};
use crate::models::Transcript;
use crate::sanitize::clean;

/// A cited answer about the evidence
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Reply with repetition loops collapsed
    pub text: String,
    pub usage: Usage,
}

/// Ask a free-form question against the loaded transcripts
///
/// The reply cites its sources as `[File @ MM:SS]` or `[File @ Pág X]`; feed
/// it to the citation extractors to make those actionable.
pub async fn chat(
    client: &GeminiClient,
    transcripts: &[Transcript],
    question: &str,
) -> Result<ChatReply> {
    let request = GenerateRequest {
        system: None,
        parts: vec![Part::Text(build_chat_prompt(transcripts, question))],
        temperature: client.config().chat_temperature,
    };

    info!("Chat over {} transcripts", transcripts.len());
    let generation = client.generate(request).await?;

    Ok(ChatReply {
        text: clean(&generation.text),
        usage: generation.usage,
    })
}
