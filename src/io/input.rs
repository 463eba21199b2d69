use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Database, DATABASE_TYPE};
use crate::models::{EvidenceFileRef, Fact, Transcript};

/// Accepted shapes of an evidence index file
#[derive(Deserialize)]
#[serde(untagged)]
enum IndexFile {
    List(Vec<EvidenceFileRef>),
    Database(Database),
}

/// Accepted shapes of a transcripts file
#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptsFile {
    Database(Database),
    List(Vec<Transcript>),
    Single(Box<Transcript>),
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

/// Parse an evidence index: a JSON array of `{id, name, type}` or a database export
pub fn parse_evidence_index(json: &str) -> Result<Vec<EvidenceFileRef>> {
    let index: IndexFile =
        serde_json::from_str(json).context("Failed to parse evidence index JSON")?;
    match index {
        IndexFile::List(files) => Ok(files),
        IndexFile::Database(db) => {
            check_database(&db)?;
            Ok(db.file_manifest)
        }
    }
}

/// Read an evidence index file
pub fn read_evidence_index(path: &Path) -> Result<Vec<EvidenceFileRef>> {
    let files = parse_evidence_index(&read_file(path)?)?;
    debug!("Loaded {} evidence files from {:?}", files.len(), path);
    Ok(files)
}

/// Parse transcripts from a database export, an array, or a single transcript
pub fn parse_transcripts(json: &str) -> Result<Vec<Transcript>> {
    let file: TranscriptsFile =
        serde_json::from_str(json).context("Failed to parse transcripts JSON")?;
    match file {
        TranscriptsFile::Database(db) => {
            check_database(&db)?;
            Ok(db.processed_data)
        }
        TranscriptsFile::List(transcripts) => Ok(transcripts),
        TranscriptsFile::Single(transcript) => Ok(vec![*transcript]),
    }
}

/// Read a transcripts file
pub fn read_transcripts(path: &Path) -> Result<Vec<Transcript>> {
    let transcripts = parse_transcripts(&read_file(path)?)?;
    debug!("Loaded {} transcripts from {:?}", transcripts.len(), path);
    Ok(transcripts)
}

/// Read a database export
pub fn read_database(path: &Path) -> Result<Database> {
    let db: Database = serde_json::from_str(&read_file(path)?)
        .with_context(|| format!("Failed to parse database: {:?}", path))?;
    check_database(&db)?;
    Ok(db)
}

fn check_database(db: &Database) -> Result<()> {
    if db.kind != DATABASE_TYPE {
        bail!("Unsupported export type: {}", db.kind);
    }
    Ok(())
}

/// Read facts to verify: a JSON array of `{id, text}`, or plain text with
/// one fact per non-empty line
pub fn read_facts(path: &Path) -> Result<Vec<Fact>> {
    let content = read_file(path)?;
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content).context("Failed to parse facts JSON");
    }
    Ok(parse_fact_lines(&content))
}

/// One fact per non-empty line, numbered from 1
pub fn parse_fact_lines(content: &str) -> Vec<Fact> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| Fact::new((i + 1).to_string(), line))
        .collect()
}

/// Expand inputs into evidence files, descending one level into directories.
///
/// Each file gets a fresh id and a type guessed from its extension.
pub fn discover_evidence(inputs: &[PathBuf]) -> Result<Vec<(EvidenceFileRef, PathBuf)>> {
    let mut found = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("Failed to read directory: {:?}", input))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .collect();
            entries.sort();
            found.extend(entries.into_iter().map(|p| (EvidenceFileRef::from_path(&p), p)));
        } else if input.is_file() {
            found.push((EvidenceFileRef::from_path(input), input.clone()));
        } else {
            warn!("Skipping missing input {:?}", input);
        }
    }

    Ok(found)
}
