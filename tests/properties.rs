use verbatim::{
    clean, extract_inline, extract_structured, parse, segment, sorted_unique, EvidenceFileRef,
    EvidenceType, InlineFragment, SeekPoint, SeekTarget, Segment, Transcript,
};

fn index() -> Vec<EvidenceFileRef> {
    vec![
        EvidenceFileRef::new("f1", "Depoimento_Joao.mp3", EvidenceType::Audio),
        EvidenceFileRef::new("f2", "Contrato.pdf", EvidenceType::Pdf),
    ]
}

const RAW_TRANSCRIPT: &str = "\
**[00:02]** **Juiz**: Pode começar. [00:05] **Testemunha**: Eu estava lá, lá, lá, lá, lá.
[00:09] **Testemunha**: Vi o carro
a sair depressa.
[00:12] [Inaudível]
[00:15] **Juiz**: sim sim sim sim sim, obrigado.
0:01:20 **Advogado**: Mais nada.";

#[test]
fn test_cleaning_is_idempotent() {
    for text in [
        RAW_TRANSCRIPT,
        "sim sim sim sim sim, correto",
        "não sei não sei não sei não sei não sei",
        "",
    ] {
        let once = clean(text);
        assert_eq!(clean(&once), once);
    }
    assert_eq!(clean("sim sim sim sim sim, correto"), "sim, correto");
}

#[test]
fn test_segment_labels_round_trip() {
    for s in segment(RAW_TRANSCRIPT) {
        assert_eq!(parse(&s.label).seek_value, s.seek_value, "label {}", s.label);
    }
}

#[test]
fn test_segments_keep_emission_order() {
    let segments = segment(RAW_TRANSCRIPT);
    let labels: Vec<&str> = segments.iter().map(|s| s.label.as_str()).collect();

    assert_eq!(labels, vec!["00:02", "00:05", "00:09", "00:15", "01:20"]);
    assert!(segments.windows(2).all(|w| w[0].seek_value <= w[1].seek_value));
    assert_eq!(segments[1].text, "**Testemunha**: Eu estava lá.");
    assert_eq!(segments[2].text, "**Testemunha**: Vi o carro a sair depressa.");
    assert_eq!(segments[3].text, "**Juiz**: sim, obrigado.");
}

#[test]
fn test_page_and_time_disambiguation() {
    assert_eq!(parse("Pág 12"), SeekPoint::new("Pág 12", 12));
    assert_eq!(parse("01:12"), SeekPoint::new("01:12", 72));
}

#[test]
fn test_sorted_unique_law() {
    let refs = [
        SeekPoint::new("02:10", 130),
        SeekPoint::new("02:10", 130),
        SeekPoint::new("00:05", 5),
    ];
    let once = sorted_unique(&refs);

    assert_eq!(once, vec![SeekPoint::new("00:05", 5), SeekPoint::new("02:10", 130)]);
    assert_eq!(sorted_unique(&once), once);
}

#[test]
fn test_structured_citation_resolution() {
    let citations = extract_structured(r#"Ele confirmou [Joao @ 01:05]: "sim, estava lá""#, &index());

    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].file_id, "f1");
    assert_eq!(citations[0].label, "01:05");
    assert_eq!(citations[0].seek_value, 65);
    assert_eq!(citations[0].excerpt_text, "sim, estava lá");

    assert!(extract_structured("[Arquivo_Inexistente @ 00:10]", &index()).is_empty());
}

#[test]
fn test_inline_references_are_actionable() {
    let fragments = extract_inline("Conforme [Contrato @ Pág 7] e [Joao @ 00:30].", &index());
    let targets: Vec<SeekTarget> = fragments
        .iter()
        .filter_map(|f| match f {
            InlineFragment::Reference { target, .. } => Some(*target),
            InlineFragment::Text { .. } => None,
        })
        .collect();

    assert_eq!(targets, vec![SeekTarget::Page(7), SeekTarget::Seconds(30)]);
}

#[test]
fn test_speaker_rename_regenerates_full_text() {
    let mut transcript = Transcript::new(
        "f1",
        "Depoimento_Joao.mp3",
        vec![
            Segment::new("00:05", 5, "**Testemunha**: Eu vi tudo."),
            Segment::new("00:09", 9, "**Juiz**: Continue."),
        ],
    );

    transcript.rename_speaker("Testemunha", "João Silva");

    assert_eq!(transcript.segments()[0].text, "**João Silva**: Eu vi tudo.");
    assert_eq!(transcript.segments()[1].text, "**Juiz**: Continue.");
    assert!(transcript.full_text().contains("João Silva"));
    assert!(!transcript.full_text().contains("Testemunha"));
}
