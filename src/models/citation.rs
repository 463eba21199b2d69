use serde::{Deserialize, Serialize};

/// Excerpt used when a citation carries no quoted text
pub const DEFAULT_EXCERPT: &str = "Referência encontrada no documento.";

/// A resolved pointer from narrative text into one evidence file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Id of the resolved evidence file
    pub file_id: String,
    /// Display name of the resolved evidence file
    pub file_name: String,
    /// Timestamp or page string exactly as quoted in the text
    #[serde(rename = "timestamp")]
    pub label: String,
    /// Seconds for audio, page number for documents
    #[serde(rename = "seconds")]
    pub seek_value: u64,
    /// Quoted snippet, or the placeholder
    #[serde(rename = "text")]
    pub excerpt_text: String,
}

impl Citation {
    pub fn has_excerpt(&self) -> bool {
        self.excerpt_text != DEFAULT_EXCERPT
    }
}

/// Where an actionable reference should take the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SeekTarget {
    /// Seek the audio player to this many seconds
    Seconds(u64),
    /// Open the original document at this page
    Page(u64),
}

impl SeekTarget {
    /// Seconds or page number, whichever this target holds
    pub fn value(&self) -> u64 {
        match *self {
            SeekTarget::Seconds(v) | SeekTarget::Page(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_wire_format() {
        let citation = Citation {
            file_id: "f1".to_string(),
            file_name: "Depoimento_Joao.mp3".to_string(),
            label: "01:05".to_string(),
            seek_value: 65,
            excerpt_text: DEFAULT_EXCERPT.to_string(),
        };

        let value = serde_json::to_value(&citation).unwrap();
        assert_eq!(value["fileId"], "f1");
        assert_eq!(value["timestamp"], "01:05");
        assert_eq!(value["seconds"], 65);
        assert!(!citation.has_excerpt());
    }
}
