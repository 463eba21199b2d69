use std::collections::HashSet;

use serde::Serialize;

use super::{resolve, scan_citation_spans};
use crate::models::EvidenceFileRef;
use crate::sanitize::{find_marker, Marker, SeekPoint};

/// Deduplicate references by label, keeping the first, then sort by seek value.
///
/// The sort is stable, so equal seek values keep their first-seen order.
pub fn sorted_unique(refs: &[SeekPoint]) -> Vec<SeekPoint> {
    let mut seen = HashSet::new();
    let mut unique: Vec<SeekPoint> = refs
        .iter()
        .filter(|r| seen.insert(r.label.as_str()))
        .cloned()
        .collect();
    unique.sort_by_key(|r| r.seek_value);
    unique
}

/// A block of a chat reply, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBlock {
    /// A line without citations
    Prose { text: String },
    /// Adjacent lines citing the same evidence file
    Citations {
        /// File fragment as written in the first line of the group
        file_ref: String,
        file: Option<EvidenceFileRef>,
        lines: Vec<String>,
        /// Every timestamp or page cited in the group, deduplicated and sorted
        refs: Vec<SeekPoint>,
    },
}

/// Split a reply into prose lines and groups of adjacent lines citing the same file.
///
/// A line belongs to a group when its first citation span names the file.
/// Lines are grouped by resolved file, or by the lowercase fragment when the
/// file does not resolve. Blank lines end a group and are dropped.
pub fn group_message(text: &str, files: &[EvidenceFileRef]) -> Vec<MessageBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, Group)> = None;

    for line in text.lines() {
        let Some(span) = scan_citation_spans(line).into_iter().next() else {
            if let Some((_, group)) = current.take() {
                blocks.push(group.finish());
            }
            if !line.trim().is_empty() {
                blocks.push(MessageBlock::Prose {
                    text: line.to_string(),
                });
            }
            continue;
        };

        let file = resolve(span.file_ref, files);
        let key = match file {
            Some(file) => file.id.clone(),
            None => span.file_ref.to_lowercase(),
        };

        if let Some((_, group)) = current.as_mut().filter(|(open_key, _)| *open_key == key) {
            group.lines.push(line.to_string());
            continue;
        }

        let group = Group {
            file_ref: span.file_ref.to_string(),
            file: file.cloned(),
            lines: vec![line.to_string()],
        };
        if let Some((_, previous)) = current.replace((key, group)) {
            blocks.push(previous.finish());
        }
    }

    if let Some((_, group)) = current {
        blocks.push(group.finish());
    }
    blocks
}

struct Group {
    file_ref: String,
    file: Option<EvidenceFileRef>,
    lines: Vec<String>,
}

impl Group {
    fn finish(self) -> MessageBlock {
        let refs: Vec<SeekPoint> = self
            .lines
            .iter()
            .flat_map(|line| line_refs(line))
            .collect();

        MessageBlock::Citations {
            file_ref: self.file_ref,
            file: self.file,
            refs: sorted_unique(&refs),
            lines: self.lines,
        }
    }
}

/// Markers cited on a line: `[File @ ref]` spans plus bare `[02:10]` / `[Pág 3]`
fn line_refs(line: &str) -> Vec<SeekPoint> {
    let mut refs: Vec<(usize, SeekPoint)> = scan_citation_spans(line)
        .into_iter()
        .filter_map(|span| {
            let (_, marker, _) = find_marker(span.ref_value)?;
            Some((span.start, marker.to_seek_point()))
        })
        .collect();
    refs.extend(bare_markers(line));
    refs.sort_by_key(|(start, _)| *start);
    refs.into_iter().map(|(_, point)| point).collect()
}

/// Bracketed markers with no file fragment, keyed by byte offset
fn bare_markers(line: &str) -> Vec<(usize, SeekPoint)> {
    line.match_indices('[')
        .filter_map(|(start, _)| {
            let inner = line[start + 1..].trim_start();
            let (marker, len) = Marker::scan(inner)?;
            inner[len..]
                .trim_start()
                .starts_with(']')
                .then(|| (start, marker.to_seek_point()))
        })
        .collect()
}
