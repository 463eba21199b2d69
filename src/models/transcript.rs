use serde::{Deserialize, Serialize};

use crate::llm::Usage;

/// One timestamped or paginated unit of transcribed text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Canonical display label: "MM:SS", "HH:MM:SS" or "Pág N"
    #[serde(rename = "timestamp")]
    pub label: String,
    /// Seconds for time labels, page number for page labels
    #[serde(rename = "seconds")]
    pub seek_value: u64,
    /// Spoken or extracted content, possibly with speaker markup
    pub text: String,
}

impl Segment {
    pub fn new(label: impl Into<String>, seek_value: u64, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            seek_value,
            text: text.into(),
        }
    }

    /// The "[label] text" line used in the derived full text
    pub fn render(&self) -> String {
        format!("[{}] {}", self.label, self.text)
    }
}

/// Join segments into the derived full-text view
pub fn render_full_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ordered segments for one evidence file plus the derived full text.
///
/// Segments are only reachable mutably through methods that regenerate
/// `full_text`, so the two cannot diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTranscript")]
pub struct Transcript {
    file_id: String,
    file_name: String,
    full_text: String,
    segments: Vec<Segment>,
    /// Unix epoch milliseconds
    processed_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<Usage>,
}

/// Wire shape of a stored transcript; `fullText` is recomputed on load
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTranscript {
    file_id: String,
    file_name: String,
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    processed_at: i64,
    #[serde(default)]
    usage: Option<Usage>,
}

impl From<StoredTranscript> for Transcript {
    fn from(stored: StoredTranscript) -> Self {
        let mut transcript = Transcript::new(stored.file_id, stored.file_name, stored.segments);
        transcript.processed_at = stored.processed_at;
        transcript.usage = stored.usage;
        transcript
    }
}

impl Transcript {
    pub fn new(file_id: impl Into<String>, file_name: impl Into<String>, segments: Vec<Segment>) -> Self {
        let full_text = render_full_text(&segments);
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
            full_text,
            segments,
            processed_at: chrono::Utc::now().timestamp_millis(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn processed_at(&self) -> i64 {
        self.processed_at
    }

    pub fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }

    /// Replace all segments and regenerate the full text
    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        self.full_text = render_full_text(&segments);
        self.segments = segments;
    }

    /// Rename a speaker across all segments; returns the number of segments changed
    pub fn rename_speaker(&mut self, old_name: &str, new_name: &str) -> usize {
        let renamed = crate::speakers::rename(&self.segments, old_name, new_name);
        let changed = renamed
            .iter()
            .zip(self.segments.iter())
            .filter(|(new, old)| new.text != old.text)
            .count();
        if changed > 0 {
            self.set_segments(renamed);
        }
        changed
    }

    /// Index of the segment playing at `seconds`.
    ///
    /// A segment covers `[seek_value, next.seek_value)`; the last one is
    /// open-ended. `None` before the first segment.
    pub fn segment_at(&self, seconds: u64) -> Option<usize> {
        self.segments.iter().enumerate().position(|(i, segment)| {
            seconds >= segment.seek_value
                && self
                    .segments
                    .get(i + 1)
                    .is_none_or(|next| seconds < next.seek_value)
        })
    }

    /// Indices of segments whose text contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.text.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_rendering() {
        let transcript = Transcript::new(
            "f1",
            "Depoimento.mp3",
            vec![
                Segment::new("00:05", 5, "Bom dia."),
                Segment::new("01:02:05", 3725, "Fim."),
            ],
        );

        assert_eq!(transcript.full_text(), "[00:05] Bom dia.\n[01:02:05] Fim.");
    }

    #[test]
    fn test_stored_transcript_recomputes_full_text() {
        let json = r#"{
            "fileId": "f1",
            "fileName": "Depoimento.mp3",
            "fullText": "stale",
            "segments": [{"timestamp": "00:10", "seconds": 10, "text": "Olá"}],
            "processedAt": 1700000000000
        }"#;

        let transcript: Transcript = serde_json::from_str(json).unwrap();

        assert_eq!(transcript.full_text(), "[00:10] Olá");
        assert_eq!(transcript.processed_at(), 1_700_000_000_000);
        assert!(transcript.usage().is_none());
    }

    #[test]
    fn test_serializes_stored_field_names() {
        let transcript = Transcript::new("f1", "a.mp3", vec![Segment::new("Pág 2", 2, "Texto")]);
        let value = serde_json::to_value(&transcript).unwrap();

        assert_eq!(value["fileId"], "f1");
        assert_eq!(value["fullText"], "[Pág 2] Texto");
        assert_eq!(value["segments"][0]["timestamp"], "Pág 2");
        assert_eq!(value["segments"][0]["seconds"], 2);
        assert!(value.get("usage").is_none());
    }

    fn hearing() -> Transcript {
        Transcript::new(
            "f1",
            "Audiencia.mp3",
            vec![
                Segment::new("00:05", 5, "**Juiz**: Bom dia."),
                Segment::new("00:12", 12, "**Testemunha**: Vi o carro azul."),
                Segment::new("01:00", 60, "**Juiz**: E o CARRO parou?"),
            ],
        )
    }

    #[test]
    fn test_segment_at() {
        let transcript = hearing();

        assert_eq!(transcript.segment_at(0), None);
        assert_eq!(transcript.segment_at(4), None);
        assert_eq!(transcript.segment_at(5), Some(0));
        assert_eq!(transcript.segment_at(11), Some(0));
        assert_eq!(transcript.segment_at(12), Some(1));
        assert_eq!(transcript.segment_at(60), Some(2));
        assert_eq!(transcript.segment_at(9_999), Some(2));
        assert_eq!(Transcript::new("f2", "b.mp3", vec![]).segment_at(3), None);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let transcript = hearing();

        assert_eq!(transcript.search("carro"), vec![1, 2]);
        assert_eq!(transcript.search("JUIZ"), vec![0, 2]);
        assert!(transcript.search("bicicleta").is_empty());
        assert!(transcript.search("  ").is_empty());
    }

    #[test]
    fn test_set_segments_regenerates_full_text() {
        let mut transcript = Transcript::new("f1", "a.mp3", vec![]);
        assert_eq!(transcript.full_text(), "");

        transcript.set_segments(vec![Segment::new("00:01", 1, "x")]);
        assert_eq!(transcript.full_text(), "[00:01] x");
    }
}
