//! Base-name normalization for recently-added deduplication.
//!
//! Providers list one entry per language/quality variant of the same title:
//! ```text
//! FR| Movie Title [MULTI-SUB]
//! EN| Movie Title 4K
//! Movie Title HD
//! ```
//! All three normalize to `movie title`, so a recently-added rail can keep a
//! single representative per title instead of a run of duplicates.

/// Quality and language tokens dropped from names when they appear as
/// standalone words.
const QUALITY_TOKENS: &[&str] = &[
    "4K",
    "HD",
    "SD",
    "UHD",
    "MULTI-SUB",
    "MULTI",
    "VF",
    "VOSTFR",
    "VO",
];

/// Normalize a provider item name into its dedup key.
///
/// Strips a leading 2–3 letter language prefix before a pipe, every
/// bracketed tag, and standalone quality/language tokens, then lowercases
/// and collapses whitespace.
///
/// # Examples
///
/// ```
/// use flickstash_catalog::base_name::normalize_base_name;
///
/// assert_eq!(normalize_base_name("FR| Movie Title [MULTI-SUB]"), "movie title");
/// assert_eq!(normalize_base_name("EN| Movie Title 4K"), "movie title");
/// assert_eq!(normalize_base_name("Movie Title HD"), "movie title");
/// ```
pub fn normalize_base_name(name: &str) -> String {
    let stripped = strip_language_prefix(name);
    let without_brackets = strip_bracketed(stripped);
    let words: Vec<&str> = without_brackets
        .split_whitespace()
        .filter(|w| !is_quality_token(w))
        .collect();
    words.join(" ").to_lowercase()
}

/// Drop a `XX|` / `XXX|` language prefix if present.
fn strip_language_prefix(name: &str) -> &str {
    if let Some(pipe) = name.find('|') {
        let prefix = name[..pipe].trim_end();
        let is_code = (2..=3).contains(&prefix.len())
            && prefix.chars().all(|c| c.is_ascii_alphabetic());
        if is_code {
            return name[pipe + 1..].trim_start();
        }
    }
    name
}

/// Remove every `[...]` segment, tolerating nesting and unbalanced brackets.
fn strip_bracketed(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0u32;
    for c in s.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_quality_token(word: &str) -> bool {
    QUALITY_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(word))
}
