pub mod citations;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod sanitize;
pub mod speakers;
pub mod stages;

pub use citations::{
    extract_inline, extract_structured, group_message, resolve, seek_target, sorted_unique,
    InlineFragment, MessageBlock,
};
pub use error::{Error, Result};
pub use io::{
    discover_evidence, read_database, read_evidence_index, read_facts, read_transcripts,
    render_report_text, render_transcript_text, transcript_text_names, write_json, write_text,
    Database,
};
pub use llm::{GeminiClient, GeminiConfig, Usage};
pub use models::{
    AnalysisReport, Citation, EvidenceFileRef, EvidenceType, Fact, FactAnalysis, FactStatus,
    SeekTarget, Segment, Transcript,
};
pub use sanitize::{build_transcript, clean, parse, segment, CleanerConfig, SeekPoint, SegmenterConfig};
pub use speakers::{detect_speakers, rename, SpeakerConvention};
pub use stages::{analyze_facts, chat, parse_report, process_file, ChatReply};
