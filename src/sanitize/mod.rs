pub mod repetition;
pub mod segmenter;
pub mod timestamp;

pub use repetition::*;
pub use segmenter::*;
pub use timestamp::*;

use tracing::debug;

use crate::error::{Error, Result};
use crate::llm::Usage;
use crate::models::{EvidenceFileRef, Transcript};

/// Run the segmentation pipeline for one evidence file.
///
/// `raw` is the text body returned by the transcription call. Its absence is
/// a caller contract violation and fails fast; empty text is a valid,
/// empty transcript.
pub fn build_transcript(
    file: &EvidenceFileRef,
    raw: Option<&str>,
    usage: Option<Usage>,
) -> Result<Transcript> {
    let raw = raw.ok_or_else(|| Error::MissingSource {
        file_id: file.id.clone(),
    })?;

    let segments = segment(raw);
    debug!("{}: {} segments", file.name, segments.len());

    let transcript = Transcript::new(&file.id, &file.name, segments);
    Ok(match usage {
        Some(usage) => transcript.with_usage(usage),
        None => transcript,
    })
}
