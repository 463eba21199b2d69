pub mod input;
pub mod output;

pub use input::*;
pub use output::*;

use serde::{Deserialize, Serialize};

use crate::models::{EvidenceFileRef, Transcript};

/// Tag identifying a database export
pub const DATABASE_TYPE: &str = "database_v2";

/// Exported transcripts plus the manifest of the files they came from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub processed_data: Vec<Transcript>,
    #[serde(default)]
    pub file_manifest: Vec<EvidenceFileRef>,
    /// Unix epoch milliseconds
    #[serde(default)]
    pub exported_at: i64,
}

impl Database {
    pub fn new(processed_data: Vec<Transcript>, file_manifest: Vec<EvidenceFileRef>) -> Self {
        Self {
            kind: DATABASE_TYPE.to_string(),
            processed_data,
            file_manifest,
            exported_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
