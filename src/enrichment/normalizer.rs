/*!
 * Post-processing of raw generated labels.
 *
 * Models occasionally wrap the answer in a labeled prefix, quotes, or a
 * trailing explanation. The normalizer strips all of that down to the bare
 * common name. It is a pure, total function: any input, including the empty
 * string, produces a well-defined output.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::Language;

/// Leading label prefixes seen in English responses, case-insensitive
static EN_PREFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^Common Name:\s*").unwrap(),
        Regex::new(r"(?i)^Name:\s*").unwrap(),
    ]
});

/// Leading label prefixes seen in Japanese responses
static JA_PREFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^呼称[:：]\s*").unwrap(),
        Regex::new(r"^日本語名[:：]\s*").unwrap(),
    ]
});

/// Quote and bracket characters stripped from both ends of an English label
const EN_QUOTES: &[char] = &['"', '\''];

/// Quote and bracket characters stripped from both ends of a Japanese label
const JA_QUOTES: &[char] = &['「', '」', '『', '』', '“', '”', '\'', '"'];

/// Clean up a raw generated label for the given target language
///
/// Steps, in order: trim; strip language-specific leading prefixes; keep only
/// the text before the first line break; strip surrounding quote characters;
/// final trim. Idempotent, and may return an empty string for empty input.
pub fn normalize(raw: &str, language: Language) -> String {
    let mut label = raw.trim().to_string();

    let prefixes: &[Regex] = match language {
        Language::English => &EN_PREFIXES,
        Language::Japanese => &JA_PREFIXES,
    };
    for pattern in prefixes {
        label = pattern.replace(&label, "").into_owned();
    }

    // Drop any trailing explanation after the first line break
    if let Some(first_line) = label.split('\n').next() {
        label = first_line.trim().to_string();
    }

    let quotes: &[char] = match language {
        Language::English => EN_QUOTES,
        Language::Japanese => JA_QUOTES,
    };
    label = label.trim_matches(quotes).to_string();

    label.trim().to_string()
}
