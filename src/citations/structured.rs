use tracing::debug;

use super::{excerpt_after, resolve, scan_citation_spans, seek_target};
use crate::models::{Citation, EvidenceFileRef, DEFAULT_EXCERPT};
use crate::sanitize::clean;

/// Extract every resolvable `[FileRef @ RefValue]` citation from a report.
///
/// Spans may be followed by `: "excerpt"`; missing excerpts get the
/// placeholder text. Works the same with or without an
/// `[[EVIDENCES]]...[[END_EVIDENCES]]` wrapper. Source order is preserved
/// and duplicates are kept; citations that do not resolve are dropped.
pub fn extract_structured(text: &str, files: &[EvidenceFileRef]) -> Vec<Citation> {
    let spans = scan_citation_spans(text);
    let found = spans.len();

    let citations: Vec<Citation> = spans
        .into_iter()
        .filter_map(|span| {
            let Some(file) = resolve(span.file_ref, files) else {
                debug!("Dropping unresolved citation [{} @ {}]", span.file_ref, span.ref_value);
                return None;
            };

            let excerpt_text = excerpt_after(text, span.end)
                .map(|(excerpt, _)| clean(excerpt).trim().to_string())
                .filter(|excerpt| !excerpt.is_empty())
                .unwrap_or_else(|| DEFAULT_EXCERPT.to_string());

            Some(Citation {
                file_id: file.id.clone(),
                file_name: file.name.clone(),
                label: span.ref_value.to_string(),
                seek_value: seek_target(file, span.ref_value).value(),
                excerpt_text,
            })
        })
        .collect();

    debug!("Extracted {} of {} citation spans", citations.len(), found);
    citations
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
    fn test_resolves_audio_citation_with_excerpt() {
        let citations = extract_structured(
            r#"Ele confirmou [Joao @ 01:05]: "sim, estava lá""#,
            &index(),
        );

        assert_eq!(citations.len(), 1);
        let citation = &citations[0];
        assert_eq!(citation.file_id, "f1");
        assert_eq!(citation.file_name, "Depoimento_Joao.mp3");
        assert_eq!(citation.label, "01:05");
        assert_eq!(citation.seek_value, 65);
        assert_eq!(citation.excerpt_text, "sim, estava lá");
    }

    #[test]
    fn test_unresolvable_citation_dropped() {
        let citations = extract_structured("[Arquivo_Inexistente @ 00:10]", &index());
        assert!(citations.is_empty());
    }

    #[test]
    fn test_evidences_block() {
        let text = "[[EVIDENCES]]\n\
            - [Joao @ 00:10]: \"vi o carro\"\n\
            - [contrato @ Pág 4]\n\
            - [Joao @ 00:10]: \"vi o carro\"\n\
            [[END_EVIDENCES]]";
        let citations = extract_structured(text, &index());

        assert_eq!(citations.len(), 3);
        assert_eq!(citations[0].seek_value, 10);
        assert_eq!(citations[1].file_id, "f2");
        assert_eq!(citations[1].label, "Pág 4");
        assert_eq!(citations[1].seek_value, 4);
        assert_eq!(citations[1].excerpt_text, DEFAULT_EXCERPT);
        assert_eq!(citations[2], citations[0]);
    }

    #[test]
    fn test_excerpt_is_cleaned() {
        let citations = extract_structured(
            r#"[Joao @ 00:02]: "não não não não não sei""#,
            &index(),
        );
        assert_eq!(citations[0].excerpt_text, "não sei");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(extract_structured("", &index()).is_empty());
        assert!(extract_structured("[Joao @ 00:10]", &[]).is_empty());
    }
}
