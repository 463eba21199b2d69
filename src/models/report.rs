use serde::{Deserialize, Serialize};

use super::Citation;
use crate::llm::Usage;

/// A fact to be verified against the evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: String,
    pub text: String,
}

impl Fact {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Verdict for a single fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactStatus {
    #[serde(rename = "Confirmado")]
    Confirmed,
    #[serde(rename = "Desmentido")]
    Denied,
    #[serde(rename = "Inconclusivo/Contraditório")]
    Inconclusive,
    #[serde(rename = "Não Mencionado")]
    NotMentioned,
}

impl FactStatus {
    /// Map a status string from the model; unknown values are inconclusive
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.starts_with("confirmado") {
            FactStatus::Confirmed
        } else if lower.starts_with("desmentido") {
            FactStatus::Denied
        } else if lower.starts_with("não mencionado") || lower.starts_with("nao mencionado") {
            FactStatus::NotMentioned
        } else {
            FactStatus::Inconclusive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactStatus::Confirmed => "Confirmado",
            FactStatus::Denied => "Desmentido",
            FactStatus::Inconclusive => "Inconclusivo/Contraditório",
            FactStatus::NotMentioned => "Não Mencionado",
        }
    }
}

/// Analysis of one fact with its supporting citations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactAnalysis {
    pub fact_id: String,
    pub fact_text: String,
    pub status: FactStatus,
    pub summary: String,
    pub citations: Vec<Citation>,
}

/// A complete fact-verification report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub id: String,
    pub name: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub results: Vec<FactAnalysis>,
    pub general_conclusion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_status_parse() {
        assert_eq!(FactStatus::parse(" Confirmado "), FactStatus::Confirmed);
        assert_eq!(FactStatus::parse("Desmentido."), FactStatus::Denied);
        assert_eq!(FactStatus::parse("Não Mencionado"), FactStatus::NotMentioned);
        assert_eq!(FactStatus::parse("Inconclusivo/Contraditório"), FactStatus::Inconclusive);
        assert_eq!(FactStatus::parse("talvez"), FactStatus::Inconclusive);
    }

    #[test]
    fn test_fact_status_wire_format() {
        let json = serde_json::to_string(&FactStatus::Inconclusive).unwrap();
        assert_eq!(json, "\"Inconclusivo/Contraditório\"");
    }
}
