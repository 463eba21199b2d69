use tracing::debug;

use super::repetition::{clean_with, CleanerConfig};
use super::timestamp::{Marker, SeekPoint};
use crate::models::Segment;

/// Characters that may decorate a marker at the start of a line
const MARKER_PREFIX: &str = "*-.([";

/// Characters that may follow a marker before the content starts
const MARKER_SUFFIX: &str = "*-)";

/// Configuration for transcript segmentation
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Lowercase tags that carry no speech, such as "inaudível"
    pub noise_markers: Vec<String>,
    /// Lowercase openings of credit lines; the whole line is noise
    pub credit_markers: Vec<String>,
    /// Lines shorter than this (in characters, trimmed) are ignored
    pub min_line_chars: usize,
    /// Repetition collapsing applied to every content line
    pub cleaner: CleanerConfig,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            noise_markers: vec![
                "inaudível".to_string(),
                "inaudivel".to_string(),
                "inaudible".to_string(),
            ],
            credit_markers: vec!["subtitles by".to_string(), "legendas por".to_string()],
            min_line_chars: 2,
            cleaner: CleanerConfig::default(),
        }
    }
}

impl SegmenterConfig {
    /// True when the content carries no speech, only known noise markers
    pub fn is_noise(&self, content: &str) -> bool {
        let lower = content.to_lowercase();
        let opening = lower.trim_start_matches(|c: char| !c.is_alphanumeric());
        if self.credit_markers.iter().any(|m| opening.starts_with(m.as_str())) {
            return true;
        }

        let rest = self
            .noise_markers
            .iter()
            .fold(lower, |text, marker| text.replace(marker.as_str(), " "));
        !rest.chars().any(char::is_alphanumeric)
    }
}

/// A classified line of model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Starts a new segment
    Marker { point: SeekPoint, text: String },
    /// Continues the speech of the open segment
    Continuation(String),
    /// Carries nothing usable
    Skip,
}

/// Fold state: finished segments plus the one still accepting continuations
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Accumulator {
    pub closed: Vec<Segment>,
    pub open: Option<Segment>,
}

impl Accumulator {
    /// Transition function of the segmentation fold
    pub fn step(mut self, line: Line) -> Self {
        match line {
            Line::Marker { point, text } => {
                let next = Segment::new(point.label, point.seek_value, text);
                if let Some(previous) = self.open.replace(next) {
                    self.closed.push(previous);
                }
            }
            Line::Continuation(text) => {
                // Orphan lines before the first marker are dropped
                if let Some(open) = self.open.as_mut() {
                    open.text.push(' ');
                    open.text.push_str(&text);
                }
            }
            Line::Skip => {}
        }
        self
    }

    pub fn finish(mut self) -> Vec<Segment> {
        self.closed.extend(self.open);
        self.closed
    }
}

/// Split raw model output into segments with the default configuration
pub fn segment(raw: &str) -> Vec<Segment> {
    segment_with(raw, &SegmenterConfig::default())
}

/// Split raw model output into ordered segments.
///
/// Segments come out in emission order; nothing is re-sorted.
pub fn segment_with(raw: &str, config: &SegmenterConfig) -> Vec<Segment> {
    let lines = normalize_lines(raw);
    let line_count = lines.len();

    let segments = lines
        .iter()
        .map(|line| classify_line(line, config))
        .fold(Accumulator::default(), Accumulator::step)
        .finish();

    debug!(
        "Segmented {} lines into {} segments",
        line_count,
        segments.len()
    );
    segments
}

/// Put every timestamp or page marker on its own line and drop blank lines
pub fn normalize_lines(raw: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for source in raw.lines() {
        let mut current = String::new();
        let mut has_content = false;
        let mut prev: Option<char> = None;

        for (i, c) in source.char_indices() {
            if has_content && starts_inline_marker(&source[i..], prev) {
                lines.push(current.trim_end().to_string());
                current.clear();
                has_content = false;
            }
            current.push(c);
            has_content |= c.is_alphanumeric();
            prev = Some(c);
        }
        lines.push(current.trim_end().to_string());
    }

    lines.retain(|l| !l.trim().is_empty());
    lines
}

/// Whether a marker that must start its own line begins at `rest`
fn starts_inline_marker(rest: &str, prev: Option<char>) -> bool {
    if let Some(inner) = rest.strip_prefix('[') {
        return match Marker::scan(inner) {
            Some((marker, _)) if marker.is_page() => true,
            Some((_, len)) => inner[len..].starts_with(']'),
            None => false,
        };
    }

    prev.is_some_and(char::is_whitespace)
        && matches!(Marker::scan(rest), Some((Marker::TimeTriple { .. }, _)))
}

/// Match a leading marker and return it with the trailing content
pub fn parse_marker_line(line: &str) -> Option<(Marker, &str)> {
    let s = line.trim_start_matches(|c: char| c.is_whitespace() || MARKER_PREFIX.contains(c));
    let (marker, len) = Marker::scan(s)?;
    let rest = &s[len..];

    let (closed, rest) = match rest.strip_prefix([']', ')', ':']) {
        Some(after) => (true, after),
        None => (false, rest),
    };

    // Decoration after the marker only counts when whitespace separates it
    // from the content, so "**Name**" markup right after "]" survives
    let suffix_len = rest
        .find(|c: char| !MARKER_SUFFIX.contains(c))
        .unwrap_or(rest.len());
    let after_suffix = &rest[suffix_len..];
    let space_len = after_suffix
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(after_suffix.len());
    let (content, spaced) = if space_len > 0 || after_suffix.is_empty() {
        (&after_suffix[space_len..], space_len > 0)
    } else {
        (rest, false)
    };

    if closed || spaced || content.is_empty() {
        Some((marker, content.trim()))
    } else {
        None
    }
}

/// Classify one normalized line
pub fn classify_line(line: &str, config: &SegmenterConfig) -> Line {
    let trimmed = line.trim();
    if trimmed.chars().count() < config.min_line_chars {
        return Line::Skip;
    }

    if let Some((marker, content)) = parse_marker_line(trimmed) {
        let text = clean_with(content, &config.cleaner).trim().to_string();
        if text.is_empty() || config.is_noise(&text) {
            return Line::Skip;
        }
        return Line::Marker {
            point: marker.to_seek_point(),
            text,
        };
    }

    let text = clean_with(trimmed, &config.cleaner).trim().to_string();
    if text.starts_with('[') || text.chars().count() <= 1 {
        Line::Skip
    } else {
        Line::Continuation(text)
    }
}
