use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use verbatim::io::DATABASE_TYPE;
use verbatim::{
    analyze_facts, build_transcript, chat, detect_speakers, discover_evidence, extract_inline,
    extract_structured, group_message, read_evidence_index, read_facts, read_transcripts,
    render_report_text, render_transcript_text, transcript_text_names, write_json, write_text,
    Database, EvidenceFileRef, EvidenceType, GeminiClient, GeminiConfig, Transcript,
};

#[derive(Parser)]
#[command(name = "verbatim")]
#[command(author, version, about = "Forensic transcript sanitization and citation extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment raw model output into a transcript (no AI call)
    Segment {
        /// Raw text returned by a transcription or extraction call
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the evidence file the text belongs to
        #[arg(long)]
        file_name: String,

        /// Evidence file id (random when omitted)
        #[arg(long)]
        file_id: Option<String>,

        /// Output file for the transcript (JSON); printed when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Transcribe audio and extract documents through the AI service
    Transcribe {
        /// Evidence files or directories
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        /// Directory for database.json and the per-file text transcripts
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Files processed at the same time
        #[arg(long, default_value = "3")]
        concurrency: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Extract citations from a report or chat reply
    Cite {
        /// Text containing [File @ MM:SS] or [File @ Pág N] citations
        #[arg(short, long)]
        input: PathBuf,

        /// Evidence index (JSON array or database export)
        #[arg(long)]
        index: PathBuf,

        /// Split the text into literal and actionable fragments instead
        #[arg(long, conflicts_with = "grouped")]
        inline: bool,

        /// Group adjacent lines citing the same file
        #[arg(long)]
        grouped: bool,

        /// Output file (JSON); printed when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Verify facts against transcripts
    Analyze {
        /// Transcripts (database export, array, or single transcript)
        #[arg(short, long)]
        transcripts: PathBuf,

        /// Facts, one per line or a JSON array of {id, text}
        #[arg(short, long)]
        facts: PathBuf,

        /// Evidence index; taken from the transcripts when omitted
        #[arg(long)]
        index: Option<PathBuf>,

        /// Output file for the report (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for a human-readable report (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Ask a question about the evidence
    Chat {
        /// Transcripts (database export, array, or single transcript)
        #[arg(short, long)]
        transcripts: PathBuf,

        /// The question
        #[arg(short, long)]
        question: String,

        /// Evidence index; taken from the transcripts when omitted
        #[arg(long)]
        index: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Rename a speaker in every segment of the transcripts
    RenameSpeaker {
        /// Transcripts (database export, array, or single transcript)
        #[arg(short, long)]
        input: PathBuf,

        /// Current speaker name
        #[arg(long)]
        from: String,

        /// New speaker name
        #[arg(long)]
        to: String,

        /// Only rename inside this evidence file id
        #[arg(long)]
        file_id: Option<String>,

        /// Output file; the input is rewritten when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the speakers detected in each transcript
    Speakers {
        /// Transcripts (database export, array, or single transcript)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Segment {
            input,
            file_name,
            file_id,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            segment_file(input, file_name, file_id, output)
        }
        Commands::Transcribe {
            input,
            output_dir,
            concurrency,
            verbose,
        } => {
            setup_logging(verbose);
            transcribe_files(input, output_dir, concurrency).await
        }
        Commands::Cite {
            input,
            index,
            inline,
            grouped,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            cite(input, index, inline, grouped, output)
        }
        Commands::Analyze {
            transcripts,
            facts,
            index,
            output,
            human_readable,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(transcripts, facts, index, output, human_readable).await
        }
        Commands::Chat {
            transcripts,
            question,
            index,
            verbose,
        } => {
            setup_logging(verbose);
            ask(transcripts, question, index).await
        }
        Commands::RenameSpeaker {
            input,
            from,
            to,
            file_id,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            rename_speaker(input, from, to, file_id, output)
        }
        Commands::Speakers { input, verbose } => {
            setup_logging(verbose);
            list_speakers(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
        return;
    }

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Print JSON to stdout, or write it to `output`
fn emit_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_json(path, value)?;
            info!("Output written to {:?}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn segment_file(
    input: PathBuf,
    file_name: String,
    file_id: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    info!("Segmenting {:?}", input);
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read file: {:?}", input))?;

    let evidence_type = EvidenceType::from_path(Path::new(&file_name));
    let file_id = file_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let file = EvidenceFileRef::new(file_id, file_name, evidence_type);

    let transcript = build_transcript(&file, Some(&raw), None)?;
    info!("{} segments", transcript.len());

    emit_json(&transcript, output.as_deref())
}

async fn transcribe_files(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    concurrency: usize,
) -> Result<()> {
    let config = GeminiConfig::from_env()?;
    let client = Arc::new(GeminiClient::new(config)?);

    let files = discover_evidence(&inputs)?;
    info!("Processing {} evidence files", files.len());

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (file, path) in files.iter().cloned() {
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read file: {:?}", path))?;
            let transcript = verbatim::process_file(&client, &file, Some(&bytes))
                .await
                .with_context(|| format!("Failed to process {}", file.name))?;
            anyhow::Ok(transcript)
        });
    }

    let mut transcripts: Vec<Transcript> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(transcript) => transcripts.push(transcript),
            Err(err) => {
                // A rejected key fails every file the same way
                if matches!(err.downcast_ref::<verbatim::Error>(), Some(verbatim::Error::AuthFailed)) {
                    return Err(err);
                }
                warn!("{:#}", err);
            }
        }
    }

    // Completion order is arbitrary; keep the input order
    let order: Vec<&str> = files.iter().map(|(f, _)| f.id.as_str()).collect();
    transcripts.sort_by_key(|t| order.iter().position(|id| *id == t.file_id()));

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create directory: {:?}", output_dir))?;
    for (transcript, name) in transcripts.iter().zip(transcript_text_names(&transcripts)) {
        write_text(&output_dir.join(name), &render_transcript_text(transcript))?;
    }

    let processed = transcripts.len();
    let manifest = files.into_iter().map(|(f, _)| f).collect();
    let db_path = output_dir.join("database.json");
    write_json(&db_path, &Database::new(transcripts, manifest))?;

    info!("{} transcripts written to {:?}", processed, db_path);
    Ok(())
}

fn cite(
    input: PathBuf,
    index: PathBuf,
    inline: bool,
    grouped: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read file: {:?}", input))?;
    let files = read_evidence_index(&index)?;

    if inline {
        emit_json(&extract_inline(&text, &files), output.as_deref())
    } else if grouped {
        emit_json(&group_message(&text, &files), output.as_deref())
    } else {
        let citations = extract_structured(&text, &files);
        info!("{} citations resolved", citations.len());
        emit_json(&citations, output.as_deref())
    }
}

/// Evidence index from a file, or derived from the transcripts themselves
fn load_index(
    index: Option<&Path>,
    transcripts_path: &Path,
    transcripts: &[Transcript],
) -> Result<Vec<EvidenceFileRef>> {
    if let Some(index) = index {
        return read_evidence_index(index);
    }
    if let Ok(files) = read_evidence_index(transcripts_path) {
        return Ok(files);
    }
    Ok(transcripts
        .iter()
        .map(|t| {
            EvidenceFileRef::new(
                t.file_id(),
                t.file_name(),
                EvidenceType::from_path(Path::new(t.file_name())),
            )
        })
        .collect())
}

async fn analyze(
    transcripts_path: PathBuf,
    facts_path: PathBuf,
    index: Option<PathBuf>,
    output: PathBuf,
    human_readable: Option<PathBuf>,
) -> Result<()> {
    let transcripts = read_transcripts(&transcripts_path)?;
    let facts = read_facts(&facts_path)?;
    let files = load_index(index.as_deref(), &transcripts_path, &transcripts)?;

    let client = GeminiClient::new(GeminiConfig::from_env()?)?;
    let report = analyze_facts(&client, &transcripts, &facts, &files)
        .await
        .context("Fact analysis failed")?;

    write_json(&output, &report)?;
    info!("Report written to {:?}", output);

    if let Some(path) = human_readable {
        write_text(&path, &render_report_text(&report))?;
        info!("Human-readable report written to {:?}", path);
    }
    Ok(())
}

async fn ask(transcripts_path: PathBuf, question: String, index: Option<PathBuf>) -> Result<()> {
    let transcripts = read_transcripts(&transcripts_path)?;
    let files = load_index(index.as_deref(), &transcripts_path, &transcripts)?;

    let client = GeminiClient::new(GeminiConfig::from_env()?)?;
    let reply = chat(&client, &transcripts, &question)
        .await
        .context("Chat failed")?;

    println!("{}", reply.text);
    println!();

    let citations = extract_structured(&reply.text, &files);
    if !citations.is_empty() {
        println!("Citations");
        println!("---------");
        for citation in &citations {
            println!("{} @ {} ({})", citation.file_name, citation.label, citation.seek_value);
        }
    }
    info!("{} tokens", reply.usage.total_tokens);
    Ok(())
}

fn rename_speaker(
    input: PathBuf,
    from: String,
    to: String,
    file_id: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read file: {:?}", input))?;
    let output = output.unwrap_or_else(|| input.clone());

    let rename_all = |transcripts: &mut [Transcript]| -> usize {
        transcripts
            .iter_mut()
            .filter(|t| file_id.as_deref().is_none_or(|id| t.file_id() == id))
            .map(|t| t.rename_speaker(&from, &to))
            .sum()
    };

    let changed = match serde_json::from_str::<Database>(&content) {
        Ok(mut db) if db.kind == DATABASE_TYPE => {
            let changed = rename_all(db.processed_data.as_mut_slice());
            write_json(&output, &db)?;
            changed
        }
        _ => {
            let mut transcripts = read_transcripts(&input)?;
            let changed = rename_all(transcripts.as_mut_slice());
            match transcripts.as_slice() {
                [single] if !content.trim_start().starts_with('[') => write_json(&output, single)?,
                _ => write_json(&output, &transcripts)?,
            }
            changed
        }
    };

    info!("Renamed {:?} to {:?} in {} segments", from, to, changed);
    Ok(())
}

fn list_speakers(input: PathBuf) -> Result<()> {
    let transcripts = read_transcripts(&input)?;

    for transcript in &transcripts {
        let speakers = detect_speakers(transcript.segments());
        println!("{} ({} speakers)", transcript.file_name(), speakers.len());
        for speaker in speakers {
            println!("  {}", speaker);
        }
    }
    Ok(())
}
