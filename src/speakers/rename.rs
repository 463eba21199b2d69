use super::{detect::starts_with_word, detect_convention, SpeakerConvention};
use crate::models::Segment;

/// Rename a speaker across segments, returning the rewritten sequence.
///
/// Each segment is rewritten in the first convention the old name appears
/// in, replacing every occurrence of that convention's form. Segments
/// without the name come back unchanged. Empty names or an unchanged name
/// make this a no-op.
pub fn rename(segments: &[Segment], old_name: &str, new_name: &str) -> Vec<Segment> {
    let old_name = old_name.trim();
    let new_name = new_name.trim();
    if old_name.is_empty() || new_name.is_empty() || old_name == new_name {
        return segments.to_vec();
    }

    segments
        .iter()
        .map(|segment| Segment {
            text: rename_in(&segment.text, old_name, new_name),
            ..segment.clone()
        })
        .collect()
}

fn rename_in(text: &str, old_name: &str, new_name: &str) -> String {
    match detect_convention(text, old_name) {
        SpeakerConvention::Bold => {
            text.replace(&format!("**{old_name}**"), &format!("**{new_name}**"))
        }
        SpeakerConvention::Colon => map_lines(text, |line| {
            let body = line.trim_start();
            let indent = &line[..line.len() - body.len()];
            match body.strip_prefix(old_name).and_then(|rest| rest.strip_prefix(':')) {
                Some(rest) => format!("{indent}{new_name}:{rest}"),
                None => line.to_string(),
            }
        }),
        SpeakerConvention::Bare => replace_whole_words(text, old_name, new_name),
        SpeakerConvention::None => text.to_string(),
    }
}

fn map_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    text.split('\n').map(f).collect::<Vec<_>>().join("\n")
}

fn replace_whole_words(text: &str, old_name: &str, new_name: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < text.len() {
        let at_boundary = !prev.is_some_and(|c| c.is_alphanumeric() || c == '_');
        if at_boundary && starts_with_word(&text[i..], old_name) {
            out.push_str(new_name);
            i += old_name.len();
            prev = old_name.chars().last();
            continue;
        }
        let Some(c) = text[i..].chars().next() else {
            break;
        };
        out.push(c);
        i += c.len_utf8();
        prev = Some(c);
    }

    out
}
