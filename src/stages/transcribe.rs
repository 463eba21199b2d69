use tracing::info;

use crate::error::{Error, Result};
use crate::llm::{extraction_prompts, mime_type_for, GeminiClient, GenerateRequest, Part};
use crate::models::{EvidenceFileRef, Transcript};
use crate::sanitize::build_transcript;

/// Transcribe or extract one evidence file into a segmented transcript
///
/// Audio is transcribed with speaker labels; every other type has its text
/// extracted with page markers. `bytes` is `None` for virtual files, which
/// exist in the index only and cannot be processed.
pub async fn process_file(
    client: &GeminiClient,
    file: &EvidenceFileRef,
    bytes: Option<&[u8]>,
) -> Result<Transcript> {
    let bytes = bytes.ok_or_else(|| Error::VirtualFile {
        name: file.name.clone(),
    })?;

    let (system, user) = extraction_prompts(file.evidence_type);
    let request = GenerateRequest {
        system: Some(system.to_string()),
        parts: vec![
            Part::InlineData {
                mime_type: mime_type_for(&file.name).to_string(),
                data: bytes.to_vec(),
            },
            Part::Text(user.to_string()),
        ],
        temperature: client.config().temperature,
    };

    info!("Processing {} ({} bytes)", file.name, bytes.len());
    let generation = client.generate(request).await?;

    let transcript = build_transcript(file, Some(&generation.text), Some(generation.usage))?;
    info!(
        "{}: {} segments, {} tokens",
        file.name,
        transcript.len(),
        transcript.usage().map(|u| u.total_tokens).unwrap_or_default()
    );
    Ok(transcript)
}
