/// Configuration for repetition collapsing
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Consecutive occurrences (first one included) that count as a loop
    pub min_repeats: usize,
    /// Shortest phrase considered, in characters
    pub min_phrase_chars: usize,
    /// Longest phrase considered, in characters
    pub max_phrase_chars: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            min_repeats: 4,
            min_phrase_chars: 5,
            max_phrase_chars: 50,
        }
    }
}

/// Collapse hallucinated repetition loops with the default configuration
pub fn clean(text: &str) -> String {
    clean_with(text, &CleanerConfig::default())
}

/// Collapse repeated words and short phrases to their first occurrence.
///
/// A run counts when the same word (or phrase) occurs at least
/// `min_repeats` times in a row, separated only by whitespace, commas or
/// periods, compared case-insensitively. Both passes repeat until neither
/// changes the text, so the result is a fixed point: cleaning it again is
/// a no-op.
pub fn clean_with(text: &str, config: &CleanerConfig) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    let min_repeats = config.min_repeats.max(2);

    loop {
        let mut changed = false;
        if let Some(collapsed) = collapse_words(&chars, min_repeats) {
            chars = collapsed;
            changed = true;
        }
        if let Some(collapsed) = collapse_phrases(&chars, min_repeats, config) {
            chars = collapsed;
            changed = true;
        }
        if !changed {
            break;
        }
    }

    chars.into_iter().collect()
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == '.'
}

fn eq_ignore_case(a: &[char], b: &[char]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.to_lowercase().eq(y.to_lowercase()))
}

/// End of the separator run starting at `from`
fn skip_separators(chars: &[char], from: usize) -> usize {
    from + chars[from..].iter().take_while(|&&c| is_separator(c)).count()
}

/// End of the word run starting at `from`
fn skip_word(chars: &[char], from: usize) -> usize {
    from + chars[from..].iter().take_while(|&&c| is_word(c)).count()
}

/// True when a span ending at `end` does not cut a word in half
fn ends_on_boundary(chars: &[char], end: usize) -> bool {
    end == chars.len() || !(is_word(chars[end - 1]) && is_word(chars[end]))
}

fn collapse_words(chars: &[char], min_repeats: usize) -> Option<Vec<char>> {
    let mut out = Vec::with_capacity(chars.len());
    let mut changed = false;
    let mut i = 0;

    while i < chars.len() {
        let starts_word = is_word(chars[i]) && (i == 0 || !is_word(chars[i - 1]));
        if !starts_word {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let word_end = skip_word(chars, i);
        let word = &chars[i..word_end];
        let mut count = 1;
        let mut run_end = word_end;

        loop {
            let next_start = skip_separators(chars, run_end);
            if next_start == run_end {
                break;
            }
            let next_end = skip_word(chars, next_start);
            if next_end == next_start || !eq_ignore_case(&chars[next_start..next_end], word) {
                break;
            }
            count += 1;
            run_end = next_end;
        }

        if count >= min_repeats {
            out.extend_from_slice(word);
            i = run_end;
            changed = true;
        } else {
            out.extend_from_slice(word);
            i = word_end;
        }
    }

    changed.then_some(out)
}

fn collapse_phrases(chars: &[char], min_repeats: usize, config: &CleanerConfig) -> Option<Vec<char>> {
    let mut out = Vec::with_capacity(chars.len());
    let mut changed = false;
    let mut i = 0;

    'outer: while i < chars.len() {
        let starts_word = is_word(chars[i]) && (i == 0 || !is_word(chars[i - 1]));
        if starts_word {
            for len in config.min_phrase_chars..=config.max_phrase_chars {
                let end = i + len;
                if end > chars.len() || chars[i..end].contains(&'\n') {
                    break;
                }
                if is_separator(chars[end - 1]) || !ends_on_boundary(chars, end) {
                    continue;
                }

                let phrase = &chars[i..end];
                let mut count = 1;
                let mut run_end = end;

                loop {
                    let next_start = skip_separators(chars, run_end);
                    let next_end = next_start + len;
                    if next_start == run_end
                        || next_end > chars.len()
                        || !eq_ignore_case(&chars[next_start..next_end], phrase)
                        || !ends_on_boundary(chars, next_end)
                    {
                        break;
                    }
                    count += 1;
                    run_end = next_end;
                }

                if count >= min_repeats {
                    out.extend_from_slice(phrase);
                    i = run_end;
                    changed = true;
                    continue 'outer;
                }
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    changed.then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_repeated_word() {
        assert_eq!(clean("sim sim sim sim sim, correto"), "sim, correto");
    }

    #[test]
    fn test_word_repeat_is_case_insensitive() {
        assert_eq!(clean("Não não, NÃO. não e depois"), "Não e depois");
    }

    #[test]
    fn test_three_repeats_are_kept() {
        let text = "muito muito muito bem";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_collapse_repeated_phrase() {
        assert_eq!(
            clean("Eu não sei, eu não sei, eu não sei, eu não sei. Pronto."),
            "Eu não sei. Pronto."
        );
    }

    #[test]
    fn test_phrase_must_align_with_words() {
        // "xhello" is not a repetition of "hello"
        let text = "xhello hello hello hello";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "A testemunha confirmou que estava lá, às 10 horas.";
        assert_eq!(clean(text), text);
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "sim sim sim sim sim, correto",
            "ok ok ok ok ok ok ok ok ok ok ok ok",
            "a b a b a b a b a b a b a b a b",
            "foi assim foi assim foi assim foi assim foi assim foi assim",
            "então, então, então, então, é isso é isso é isso é isso",
            "la la la la. la la la la. la la la la. la la la la.",
            "texto normal sem repetição",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "input {sample:?}");
        }
    }

    #[test]
    fn test_custom_config() {
        let config = CleanerConfig {
            min_repeats: 2,
            ..Default::default()
        };
        assert_eq!(clean_with("sim sim, correto", &config), "sim, correto");
    }
}
