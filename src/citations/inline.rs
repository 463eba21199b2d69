use serde::Serialize;

use super::{resolve, scan_citation_spans, seek_target};
use crate::models::{EvidenceFileRef, SeekTarget};

/// A piece of prose split around inline citation markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InlineFragment {
    /// Literal text, including citation spans that did not resolve
    Text { text: String },
    /// A resolved, actionable reference
    Reference {
        file_id: String,
        file_name: String,
        /// Reference exactly as written after the `@`
        label: String,
        target: SeekTarget,
    },
}

/// Split text into literal runs and actionable `[FileRef @ RefValue]` references.
///
/// Concatenating the literal text of every fragment, with each reference
/// rendered back as its original span, reproduces the input.
pub fn extract_inline(text: &str, files: &[EvidenceFileRef]) -> Vec<InlineFragment> {
    let mut fragments = Vec::new();
    let mut literal = String::new();
    let mut cursor = 0;

    for span in scan_citation_spans(text) {
        let Some(file) = resolve(span.file_ref, files) else {
            continue;
        };

        literal.push_str(&text[cursor..span.start]);
        if !literal.is_empty() {
            fragments.push(InlineFragment::Text {
                text: std::mem::take(&mut literal),
            });
        }

        fragments.push(InlineFragment::Reference {
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            label: span.ref_value.to_string(),
            target: seek_target(file, span.ref_value),
        });
        cursor = span.end;
    }

    literal.push_str(&text[cursor..]);
    if !literal.is_empty() {
        fragments.push(InlineFragment::Text { text: literal });
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EvidenceType;

    fn index() -> Vec<EvidenceFileRef> {
        vec![
            EvidenceFileRef::new("f1", "Depoimento_Joao.mp3", EvidenceType::Audio),
            EvidenceFileRef::new("f2", "Contrato.pdf", EvidenceType::Pdf),
        ]
    }

    #[test]
    fn test_inline_audio_and_document_references() {
        let fragments = extract_inline(
            "Ele disse [Joao @ 01:05] e o contrato diz [contrato @ Pág 3].",
            &index(),
        );

        assert_eq!(fragments.len(), 5);
        assert_eq!(
            fragments[0],
            InlineFragment::Text {
                text: "Ele disse ".to_string()
            }
        );
        assert_eq!(
            fragments[1],
            InlineFragment::Reference {
                file_id: "f1".to_string(),
                file_name: "Depoimento_Joao.mp3".to_string(),
                label: "01:05".to_string(),
                target: SeekTarget::Seconds(65),
            }
        );
        match &fragments[3] {
            InlineFragment::Reference { file_id, target, .. } => {
                assert_eq!(file_id, "f2");
                assert_eq!(*target, SeekTarget::Page(3));
            }
            other => panic!("expected reference, got {other:?}"),
        }
        assert_eq!(
            fragments[4],
            InlineFragment::Text {
                text: ".".to_string()
            }
        );
    }

    #[test]
    fn test_unresolved_spans_stay_literal() {
        let text = "Ver [Arquivo_Inexistente @ 00:10] e [nota].";
        let fragments = extract_inline(text, &index());

        assert_eq!(
            fragments,
            vec![InlineFragment::Text {
                text: text.to_string()
            }]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_inline("", &index()).is_empty());
    }
}
