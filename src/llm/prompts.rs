use crate::models::{EvidenceType, Fact, Transcript};

/// System prompt for audio transcription
pub const AUDIO_SYSTEM_PROMPT: &str = "És um Transcritor Forense Profissional. \
1. Transcreve TODA a gravação. \
2. Identifica o orador. \
3. FORMATO: [MM:SS] Orador: Texto...";

/// User prompt sent alongside the audio bytes
pub const AUDIO_USER_PROMPT: &str = "Faz a transcrição integral e diarizada deste áudio.";

/// System prompt for document text extraction
pub const DOCUMENT_SYSTEM_PROMPT: &str = "És um Assistente Legal. Extrai texto e usa [Pág X].";

/// User prompt sent alongside the document bytes
pub const DOCUMENT_USER_PROMPT: &str = "Extrai o texto completo deste documento.";

/// System prompt for fact analysis; the reply follows the block markers parsed
/// by the fact analysis stage
pub const FACT_ANALYSIS_SYSTEM_PROMPT: &str = r#"És um Juiz Analista Forense. Analisa cada facto contra as evidências.
OBRIGATÓRIO: Para cada afirmação, cita a fonte no formato [NomeArquivo @ Tempo/Pág].
ESTRUTURA DE RESPOSTA POR FACTO:
[[FACT]] ID: {id}
[[STATUS]] {Confirmado | Desmentido | Inconclusivo/Contraditório}
[[SUMMARY]] {Justificação detalhada mencionando contradições se existirem}
[[EVIDENCES]]
- [Arquivo @ Tempo]: "Trecho da fala ou texto citado"
[[END_FACT]]

No fim, gera [[CONCLUSION]] {Geral} [[END_CONCLUSION]]."#;

/// Rule appended to every chat question
pub const CHAT_CITATION_RULE: &str = "Cita obrigatoriamente a fonte em cada afirmação usando \
[NomeArquivo @ MM:SS] ou [NomeArquivo @ Pág X].";

/// System and user prompts for turning one evidence file into text
pub fn extraction_prompts(evidence_type: EvidenceType) -> (&'static str, &'static str) {
    if evidence_type.is_audio() {
        (AUDIO_SYSTEM_PROMPT, AUDIO_USER_PROMPT)
    } else {
        (DOCUMENT_SYSTEM_PROMPT, DOCUMENT_USER_PROMPT)
    }
}

/// Transcripts wrapped in `<tag name="...">` elements, one per line
pub fn build_evidence_context(transcripts: &[Transcript], tag: &str) -> String {
    transcripts
        .iter()
        .map(|t| format!("<{tag} name=\"{}\">{}</{tag}>", t.file_name(), t.full_text()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// User prompt for fact analysis
pub fn build_fact_analysis_prompt(transcripts: &[Transcript], facts: &[Fact]) -> String {
    let facts_list = facts
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. [ID: {}] {}", i + 1, f.id, f.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "EVIDÊNCIAS DISPONÍVEIS:\n{}\n\nFACTOS A ANALISAR:\n{}",
        build_evidence_context(transcripts, "file"),
        facts_list
    )
}

/// User prompt for a chat question
pub fn build_chat_prompt(transcripts: &[Transcript], question: &str) -> String {
    format!(
        "CONTEXTO FORENSE:\n{}\n\nPERGUNTA DO UTILIZADOR: {}\n\nREGRAS: {}",
        build_evidence_context(transcripts, "doc"),
        question,
        CHAT_CITATION_RULE
    )
}
