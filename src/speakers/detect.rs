use std::collections::BTreeSet;

use super::SpeakerConvention;
use crate::models::Segment;
use crate::sanitize::Marker;

/// Names at or above this length (in characters) are not speaker labels
const MAX_SPEAKER_CHARS: usize = 50;

/// Which convention `name` is written in within `text`.
///
/// Checked in priority order: bold, then colon at a line start, then a bare
/// leading word. Matching is case-sensitive.
pub fn detect_convention(text: &str, name: &str) -> SpeakerConvention {
    if name.is_empty() {
        return SpeakerConvention::None;
    }
    if text.contains(&format!("**{name}**")) {
        return SpeakerConvention::Bold;
    }
    if text
        .lines()
        .any(|line| line.trim_start().strip_prefix(name).is_some_and(|rest| rest.starts_with(':')))
    {
        return SpeakerConvention::Colon;
    }
    if starts_with_word(text.trim_start(), name) {
        return SpeakerConvention::Bare;
    }
    SpeakerConvention::None
}

/// True when `s` begins with `word` followed by a non-word character or the end
pub(crate) fn starts_with_word(s: &str, word: &str) -> bool {
    s.strip_prefix(word)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

/// Speaker label that opens a segment, in bold or colon form
pub fn leading_speaker(text: &str) -> Option<&str> {
    let s = text.trim_start();

    let name = if let Some(inner) = s.strip_prefix("**") {
        let close = inner.find("**")?;
        inner[..close].trim()
    } else {
        let end = s.find([':', '\n', '*'])?;
        if !s[end..].starts_with(':') {
            return None;
        }
        s[..end].trim()
    };

    let plausible = !name.is_empty()
        && name.chars().count() < MAX_SPEAKER_CHARS
        && Marker::scan(name).is_none()
        && !name.chars().all(|c| c.is_ascii_digit());
    plausible.then_some(name)
}

/// Distinct leading speakers across segments, sorted
pub fn detect_speakers(segments: &[Segment]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|s| leading_speaker(&s.text))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
