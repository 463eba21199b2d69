use chrono::{Local, Utc};
use tracing::{info, warn};

use crate::citations::extract_structured;
use crate::error::Result;
use crate::llm::{
    build_fact_analysis_prompt, GeminiClient, GenerateRequest, Part, FACT_ANALYSIS_SYSTEM_PROMPT,
};
use crate::models::{AnalysisReport, EvidenceFileRef, Fact, FactAnalysis, FactStatus, Transcript};

const FACT_MARKER: &str = "[[FACT]]";
const CONCLUSION_OPEN: &str = "[[CONCLUSION]]";
const CONCLUSION_CLOSE: &str = "[[END_CONCLUSION]]";

/// Markers that close an evidence list
const EVIDENCE_TERMINATORS: [&str; 3] = ["[[END_FACT]]", "[[END_EVIDENCES]]", CONCLUSION_OPEN];

/// Verify facts against the transcripts and build a report
pub async fn analyze_facts(
    client: &GeminiClient,
    transcripts: &[Transcript],
    facts: &[Fact],
    files: &[EvidenceFileRef],
) -> Result<AnalysisReport> {
    let request = GenerateRequest {
        system: Some(FACT_ANALYSIS_SYSTEM_PROMPT.to_string()),
        parts: vec![Part::Text(build_fact_analysis_prompt(transcripts, facts))],
        temperature: client.config().temperature,
    };

    info!(
        "Analyzing {} facts against {} transcripts",
        facts.len(),
        transcripts.len()
    );
    let generation = client.generate(request).await?;

    let (results, general_conclusion) = parse_report(&generation.text, facts, files);
    if results.len() < facts.len() {
        warn!(
            "Model answered {} of {} facts",
            results.len(),
            facts.len()
        );
    }

    let now = Utc::now();
    Ok(AnalysisReport {
        id: now.timestamp_millis().to_string(),
        name: format!("Análise de Caso - {}", Local::now().format("%d/%m/%Y")),
        generated_at: now.to_rfc3339(),
        results,
        general_conclusion,
        usage: Some(generation.usage),
    })
}

/// Parse the block-marked analysis reply into per-fact results and the
/// general conclusion.
///
/// Blocks without an `ID:` line are skipped. Missing sections leave empty
/// text; a missing or unknown status is inconclusive.
pub fn parse_report(
    raw: &str,
    facts: &[Fact],
    files: &[EvidenceFileRef],
) -> (Vec<FactAnalysis>, String) {
    let conclusion = raw
        .split_once(CONCLUSION_OPEN)
        .and_then(|(_, rest)| rest.split_once(CONCLUSION_CLOSE))
        .map(|(body, _)| body.trim().to_string())
        .unwrap_or_default();

    let results = raw
        .split(FACT_MARKER)
        .skip(1)
        .filter_map(|block| parse_fact_block(block, facts, files))
        .collect();

    (results, conclusion)
}

fn parse_fact_block(block: &str, facts: &[Fact], files: &[EvidenceFileRef]) -> Option<FactAnalysis> {
    let (_, after_id) = block.split_once("ID:")?;
    let id_end = after_id.find(['\n', '[']).unwrap_or(after_id.len());
    let fact_id = after_id[..id_end].trim().to_string();

    let status = section(block, "[[STATUS]]")
        .map(FactStatus::parse)
        .unwrap_or(FactStatus::Inconclusive);
    let summary = section(block, "[[SUMMARY]]").unwrap_or_default().to_string();

    let citations = block
        .split_once("[[EVIDENCES]]")
        .map(|(_, rest)| {
            let end = EVIDENCE_TERMINATORS
                .iter()
                .filter_map(|m| rest.find(m))
                .min()
                .unwrap_or(rest.len());
            extract_structured(&rest[..end], files)
        })
        .unwrap_or_default();

    let fact_text = facts
        .iter()
        .find(|f| f.id == fact_id)
        .map(|f| f.text.clone())
        .unwrap_or_default();

    Some(FactAnalysis {
        fact_id,
        fact_text,
        status,
        summary,
        citations,
    })
}

/// Body of a `[[NAME]]` section, up to its `[[END_NAME]]` or the next marker
fn section<'a>(block: &'a str, open: &str) -> Option<&'a str> {
    let (_, rest) = block.split_once(open)?;
    let end = rest.find("[[").unwrap_or(rest.len());
    Some(rest[..end].trim())
}
