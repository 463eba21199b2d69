/// A `[FileRef @ RefValue]` span located in a larger text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationSpan<'a> {
    /// Byte offset of the opening bracket
    pub start: usize,
    /// Byte offset just past the closing bracket
    pub end: usize,
    /// File name fragment before the first `@`, trimmed
    pub file_ref: &'a str,
    /// Timestamp or page after the first `@`, trimmed
    pub ref_value: &'a str,
}

/// Find every single-line bracketed span that has a non-empty file
/// fragment and reference on either side of an `@`.
///
/// Spans never nest: a `[` inside a span restarts the search there, so
/// "[nota] [Joao @ 01:05]" yields only the second span.
pub fn scan_citation_spans(text: &str) -> Vec<CitationSpan<'_>> {
    let mut spans = Vec::new();
    let mut from = 0;

    while let Some(offset) = text[from..].find('[') {
        let start = from + offset;
        let body_start = start + 1;

        let Some(stop) = text[body_start..].find(['[', ']', '\n']) else {
            break;
        };
        let stop = body_start + stop;

        if !text[stop..].starts_with(']') {
            from = stop;
            continue;
        }

        if let Some(span) = split_span(text, start, stop) {
            spans.push(span);
        }
        from = stop + 1;
    }

    spans
}

fn split_span(text: &str, start: usize, close: usize) -> Option<CitationSpan<'_>> {
    let inner = &text[start + 1..close];
    let (file_ref, ref_value) = inner.split_once('@')?;
    let file_ref = file_ref.trim();
    let ref_value = ref_value.trim();
    if file_ref.is_empty() || ref_value.is_empty() {
        return None;
    }
    Some(CitationSpan {
        start,
        end: close + 1,
        file_ref,
        ref_value,
    })
}

/// Quoted excerpt right after a span: `: "excerpt"` with straight or curly quotes.
///
/// Returns the excerpt and the byte offset just past the closing quote.
pub fn excerpt_after(text: &str, from: usize) -> Option<(&str, usize)> {
    let rest = &text[from..];
    let after_ws = rest.trim_start_matches([' ', '\t']);
    let after_colon = after_ws.strip_prefix(':')?;
    let after_ws = after_colon.trim_start_matches([' ', '\t']);
    let open = after_ws.chars().next().filter(|&c| matches!(c, '"' | '“'))?;
    let body = &after_ws[open.len_utf8()..];

    let close = body.find(['"', '”', '\n'])?;
    if body[close..].starts_with('\n') {
        return None;
    }
    let close_len = body[close..].chars().next().map(char::len_utf8).unwrap_or(1);
    let consumed = text.len() - body.len() + close + close_len;
    Some((body[..close].trim(), consumed))
}
