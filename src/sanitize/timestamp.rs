use serde::{Deserialize, Serialize};

/// Page keywords, longest first so "página" is not read as "pág" + "ina"
const PAGE_KEYWORDS: [&str; 5] = ["página", "pagina", "page", "pág", "pag"];

/// Largest page number accepted, in digits
const MAX_PAGE_DIGITS: usize = 6;

/// Canonical display label plus the numeric key used for ordering and seeking
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekPoint {
    pub label: String,
    pub seek_value: u64,
}

impl SeekPoint {
    pub fn new(label: impl Into<String>, seek_value: u64) -> Self {
        Self {
            label: label.into(),
            seek_value,
        }
    }
}

/// A recognized timestamp or page marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `H:MM:SS` / `HH:MM:SS`
    TimeTriple { hours: u64, minutes: u64, seconds: u64 },
    /// `M:SS` / `MM:SS` (also `MMM:SS` for long recordings)
    TimePair { minutes: u64, seconds: u64 },
    /// `Pág N`, `Pag. N`, `Page N`, `Página N`
    Page(u64),
}

impl Marker {
    /// Recognize a marker starting exactly at the beginning of `s`.
    ///
    /// Returns the marker and the number of bytes it spans. Cases are tried
    /// in priority order: time triple, time pair, page.
    pub fn scan(s: &str) -> Option<(Marker, usize)> {
        scan_time_triple(s)
            .or_else(|| scan_time_pair(s))
            .or_else(|| scan_page(s))
    }

    /// Seconds for time markers, the page number for page markers
    pub fn seek_value(&self) -> u64 {
        match *self {
            Marker::TimeTriple {
                hours,
                minutes,
                seconds,
            } => hours
                .saturating_mul(3600)
                .saturating_add(minutes.saturating_mul(60))
                .saturating_add(seconds),
            Marker::TimePair { minutes, seconds } => {
                minutes.saturating_mul(60).saturating_add(seconds)
            }
            Marker::Page(page) => page,
        }
    }

    /// Canonical label; a zero hours field is dropped
    pub fn label(&self) -> String {
        match *self {
            Marker::TimeTriple {
                hours,
                minutes,
                seconds,
            } if hours > 0 => format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
            Marker::TimeTriple {
                minutes, seconds, ..
            }
            | Marker::TimePair { minutes, seconds } => format!("{:02}:{:02}", minutes, seconds),
            Marker::Page(page) => format!("Pág {}", page),
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self, Marker::Page(_))
    }

    pub fn to_seek_point(&self) -> SeekPoint {
        SeekPoint::new(self.label(), self.seek_value())
    }
}

/// Parse a timestamp or page notation into a canonical label and seek value.
///
/// Never fails: input with no recognizable marker yields a seek value of 0
/// and the trimmed input as label.
pub fn parse(raw: &str) -> SeekPoint {
    let trimmed = raw.trim();
    match find_marker(trimmed) {
        Some((_, marker, _)) => marker.to_seek_point(),
        None => SeekPoint::new(trimmed, 0),
    }
}

/// Find the first marker in `s` that starts on a word boundary.
///
/// Returns `(start, marker, end)` as byte offsets.
pub fn find_marker(s: &str) -> Option<(usize, Marker, usize)> {
    let mut prev: Option<char> = None;
    for (i, c) in s.char_indices() {
        if !prev.is_some_and(|p| p.is_alphanumeric()) {
            if let Some((marker, len)) = Marker::scan(&s[i..]) {
                return Some((i, marker, i + len));
            }
        }
        prev = Some(c);
    }
    None
}

/// First run of digits in `raw`, used to open documents at a page
pub fn page_number(raw: &str) -> Option<u64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let run: &str = &raw[start..];
    let end = run
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(run.len());
    run[..end].parse().ok()
}

/// Leading ASCII digits of `s`, accepted only when the run length is within bounds
fn take_digits(s: &str, min: usize, max: usize) -> Option<(u64, usize)> {
    let len = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    if len < min || len > max {
        return None;
    }
    s[..len].parse().ok().map(|v| (v, len))
}

fn scan_time_triple(s: &str) -> Option<(Marker, usize)> {
    let (hours, a) = take_digits(s, 1, 2)?;
    let rest = s[a..].strip_prefix(':')?;
    let (minutes, b) = take_digits(rest, 1, 2)?;
    let rest = rest[b..].strip_prefix(':')?;
    let (seconds, c) = take_digits(rest, 2, 2)?;
    Some((
        Marker::TimeTriple {
            hours,
            minutes,
            seconds,
        },
        a + 1 + b + 1 + c,
    ))
}

fn scan_time_pair(s: &str) -> Option<(Marker, usize)> {
    let (minutes, a) = take_digits(s, 1, 3)?;
    let rest = s[a..].strip_prefix(':')?;
    let (seconds, b) = take_digits(rest, 2, 2)?;
    Some((Marker::TimePair { minutes, seconds }, a + 1 + b))
}

fn scan_page(s: &str) -> Option<(Marker, usize)> {
    let rest = PAGE_KEYWORDS
        .iter()
        .find_map(|kw| strip_prefix_ignore_case(s, kw))?;
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let rest = rest.trim_start_matches([' ', '\t']);
    let (page, len) = take_digits(rest, 1, MAX_PAGE_DIGITS)?;
    let consumed = s.len() - rest.len() + len;
    Some((Marker::Page(page), consumed))
}

/// Strip `prefix` from `s` comparing case-insensitively, accents included
pub(crate) fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = s.char_indices();
    for expected in prefix.chars() {
        let (_, c) = chars.next()?;
        if !c.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let end = chars.next().map(|(i, _)| i).unwrap_or(s.len());
    Some(&s[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_pair() {
        let point = parse("01:12");
        assert_eq!(point.label, "01:12");
        assert_eq!(point.seek_value, 72);

        let point = parse("[2:05]");
        assert_eq!(point.label, "02:05");
        assert_eq!(point.seek_value, 125);
    }

    #[test]
    fn test_parse_time_triple() {
        let point = parse("1:02:05");
        assert_eq!(point.label, "01:02:05");
        assert_eq!(point.seek_value, 3725);
    }

    #[test]
    fn test_zero_hours_drop_to_pair_label() {
        let point = parse("00:01:05");
        assert_eq!(point.label, "01:05");
        assert_eq!(point.seek_value, 65);
    }

    #[test]
    fn test_parse_page_variants() {
        for raw in ["Pág 12", "pag 12", "PÁG. 12", "Page 12", "Página 12", "[Pág12]"] {
            let point = parse(raw);
            assert_eq!(point.label, "Pág 12", "input {raw}");
            assert_eq!(point.seek_value, 12, "input {raw}");
        }
    }

    #[test]
    fn test_time_wins_over_page() {
        // A time triple is preferred to a shorter pair at the same position
        let (marker, len) = Marker::scan("10:20:30 resto").unwrap();
        assert_eq!(
            marker,
            Marker::TimeTriple {
                hours: 10,
                minutes: 20,
                seconds: 30
            }
        );
        assert_eq!(len, 8);
    }

    #[test]
    fn test_out_of_range_minutes_accepted() {
        let point = parse("75:30");
        assert_eq!(point.label, "75:30");
        assert_eq!(point.seek_value, 75 * 60 + 30);
    }

    #[test]
    fn test_malformed_degrades_to_zero() {
        let point = parse("  sem marcação ");
        assert_eq!(point.label, "sem marcação");
        assert_eq!(point.seek_value, 0);

        assert_eq!(parse("").seek_value, 0);
        assert_eq!(parse("12:5").seek_value, 0);
        assert_eq!(parse("pagamento").seek_value, 0);
    }

    #[test]
    fn test_find_marker_requires_boundary() {
        assert!(find_marker("abc12:30").is_none());
        let (start, marker, end) = find_marker("às 12:30 horas").unwrap();
        assert_eq!(marker.seek_value(), 750);
        assert_eq!(&"às 12:30 horas"[start..end], "12:30");
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number("Pág 7"), Some(7));
        assert_eq!(page_number("01:05"), Some(1));
        assert_eq!(page_number("sem número"), None);
    }

    #[test]
    fn test_label_round_trip() {
        for raw in ["0:07", "59:59", "3:00:00", "Pag 4", "12:34:56"] {
            let point = parse(raw);
            assert_eq!(parse(&point.label).seek_value, point.seek_value, "input {raw}");
        }
    }
}
