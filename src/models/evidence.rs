use std::path::Path;

use serde::{Deserialize, Serialize};

/// Kind of evidence file, as stored in the project manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceType {
    /// Recorded testimony; seek values are seconds
    Audio,
    /// Generic document; seek values are page numbers
    Document,
    Pdf,
    Image,
    Text,
    Other,
}

/// How a seek value on a given evidence file is to be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekUnit {
    Seconds,
    Page,
}

impl EvidenceType {
    pub fn seek_unit(&self) -> SeekUnit {
        match self {
            EvidenceType::Audio => SeekUnit::Seconds,
            _ => SeekUnit::Page,
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, EvidenceType::Audio)
    }

    /// Guess the evidence type from a file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "mp3" | "wav" | "m4a" | "ogg" | "flac" | "aac" | "opus" | "webm" => EvidenceType::Audio,
            "pdf" => EvidenceType::Pdf,
            "png" | "jpg" | "jpeg" | "webp" | "heic" => EvidenceType::Image,
            "txt" | "md" => EvidenceType::Text,
            "doc" | "docx" | "odt" | "rtf" => EvidenceType::Document,
            _ => EvidenceType::Other,
        }
    }
}

/// Minimal view of an evidence file needed to resolve citations against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFileRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,
}

impl EvidenceFileRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, evidence_type: EvidenceType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            evidence_type,
        }
    }

    /// Build a reference for a file on disk with a fresh id
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            evidence_type: EvidenceType::from_path(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_evidence_ref() {
        let json = r#"{"id": "f1", "name": "Depoimento_Joao.mp3", "type": "AUDIO"}"#;
        let file: EvidenceFileRef = serde_json::from_str(json).unwrap();

        assert_eq!(file.id, "f1");
        assert_eq!(file.evidence_type, EvidenceType::Audio);
        assert_eq!(file.evidence_type.seek_unit(), SeekUnit::Seconds);
    }

    #[test]
    fn test_document_types_seek_by_page() {
        for t in [EvidenceType::Document, EvidenceType::Pdf, EvidenceType::Image] {
            assert_eq!(t.seek_unit(), SeekUnit::Page);
        }
    }

    #[test]
    fn test_type_from_extension() {
        assert_eq!(EvidenceType::from_path(Path::new("a/b/Depoimento.MP3")), EvidenceType::Audio);
        assert_eq!(EvidenceType::from_path(Path::new("contrato.pdf")), EvidenceType::Pdf);
        assert_eq!(EvidenceType::from_path(Path::new("sem_extensao")), EvidenceType::Other);
    }
}
