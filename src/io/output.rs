use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{AnalysisReport, Transcript};

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

/// Write text to a file
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write file: {:?}", path))
}

/// Format epoch milliseconds as an RFC 3339 timestamp
fn format_processed_at(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

/// Text output names for `transcripts`, in order.
///
/// Names shared by several transcripts (ignoring case) get the file id
/// appended so no output overwrites another.
pub fn transcript_text_names(transcripts: &[Transcript]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for transcript in transcripts {
        *counts.entry(transcript.file_name().to_lowercase()).or_default() += 1;
    }

    transcripts
        .iter()
        .map(|t| match counts.get(&t.file_name().to_lowercase()) {
            Some(&n) if n > 1 => format!("{}-{}.txt", t.file_name(), t.file_id()),
            _ => format!("{}.txt", t.file_name()),
        })
        .collect()
}

/// Human-readable transcript: a short header followed by the full text
pub fn render_transcript_text(transcript: &Transcript) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n", transcript.file_name()));
    output.push_str(&format!(
        "Processado em: {}\n",
        format_processed_at(transcript.processed_at())
    ));
    output.push_str(&format!("Segmentos: {}\n", transcript.len()));
    if let Some(usage) = transcript.usage() {
        output.push_str(&format!("Tokens: {}\n", usage.total_tokens));
    }
    output.push('\n');
    output.push_str(transcript.full_text());
    output.push('\n');

    output
}

/// Human-readable fact analysis report
pub fn render_report_text(report: &AnalysisReport) -> String {
    let mut output = format!("# {}\n\n", report.name);

    for result in &report.results {
        output.push_str(&format!("## [{}] {}\n", result.fact_id, result.fact_text));
        output.push_str(&format!("Estado: {}\n", result.status.as_str()));
        if !result.summary.is_empty() {
            output.push_str(&format!("{}\n", result.summary));
        }
        for citation in &result.citations {
            output.push_str(&format!(
                "- [{} @ {}]: \"{}\"\n",
                citation.file_name, citation.label, citation.excerpt_text
            ));
        }
        output.push('\n');
    }

    if !report.general_conclusion.is_empty() {
        output.push_str(&format!("## Conclusão\n{}\n", report.general_conclusion));
    }

    output
}
