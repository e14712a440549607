//! Token grammar shared by the extractor and the substitution engine.
//!
//! A token is the marker `@` followed by one or more word characters or `%`:
//! `@nome`, `@valor_total`, `@taxa%`. Two boundary rules keep e-mail
//! addresses and decorated identifiers out:
//!
//! - the marker must not follow a word character or a `.`
//!   (`contato@nome` is not a token)
//! - the token must not be followed by `.` plus two or more lowercase letters
//!   ending at a word boundary (`@nome.com` is not a token, `@nome.` is)
//!
//! `regex` has no lookaround, so candidates are found with a plain pattern and
//! then filtered. [`find_tokens`] and [`replace_key`] both go through
//! [`boundary_before`] and [`boundary_after`], so the two can never disagree on
//! what an occurrence is.

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::TOKEN_MARKER;

// Greedy, so a rejected candidate is never retried as a shorter token
static TOKEN_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let marker = regex::escape(&TOKEN_MARKER.to_string());
    Regex::new(&format!(r"{marker}[\w%]+")).ok()
});

/// A token occurrence in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// Byte offset of the marker
    pub start: usize,
    /// Byte offset one past the last token character
    pub end: usize,
    /// The token text, marker included
    pub token: String,
}

/// Word character in the Unicode sense: alphanumeric or `_`.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a token may start at byte offset `start`.
pub fn boundary_before(text: &str, start: usize) -> bool {
    match text[..start].chars().next_back() {
        Some(c) => !(is_word_char(c) || c == '.'),
        None => true,
    }
}

/// Whether a token may end at byte offset `end`.
///
/// Rejects a following `.xx` suffix of two or more lowercase ASCII letters
/// that is not itself followed by a word character.
pub fn boundary_after(text: &str, end: usize) -> bool {
    let Some(rest) = text[end..].strip_prefix('.') else {
        return true;
    };

    let letters = rest.chars().take_while(char::is_ascii_lowercase).count();
    if letters < 2 {
        return true;
    }

    // ASCII letters are one byte each
    match rest[letters..].chars().next() {
        Some(c) => is_word_char(c),
        None => false,
    }
}

/// Every token occurrence in `text`, left to right.
///
/// Tokens are matched greedily: `@valor_total` is one token, never `@valor`.
///
/// # Examples
///
/// ```rust
/// use docfill::templating::grammar::find_tokens;
///
/// let tokens: Vec<_> = find_tokens("Cliente: @nome (contato@nome.com), @taxa%.")
///     .into_iter()
///     .map(|m| m.token)
///     .collect();
/// assert_eq!(tokens, vec!["@nome", "@taxa%"]);
/// ```
pub fn find_tokens(text: &str) -> Vec<TokenMatch> {
    let Some(pattern) = TOKEN_PATTERN.as_ref() else {
        return Vec::new();
    };

    pattern
        .find_iter(text)
        .filter(|m| boundary_before(text, m.start()) && boundary_after(text, m.end()))
        .map(|m| TokenMatch {
            start: m.start(),
            end: m.end(),
            token: m.as_str().to_string(),
        })
        .collect()
}

/// Whether `text` has at least one marker character at all.
pub fn has_marker(text: &str) -> bool {
    text.contains(TOKEN_MARKER)
}

/// Byte ranges where `key` occurs in `text` under the token boundary rules.
pub fn key_occurrences(text: &str, key: &str) -> Vec<(usize, usize)> {
    if key.is_empty() {
        return Vec::new();
    }
    let Ok(pattern) = Regex::new(&regex::escape(key)) else {
        return Vec::new();
    };

    pattern
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .filter(|&(start, end)| boundary_before(text, start) && boundary_after(text, end))
        .collect()
}

/// Replace every bounded occurrence of `key` in `text` with `value`.
///
/// Returns the new text and the number of replacements. The inserted value is
/// not rescanned for `key`.
pub fn replace_key(text: &str, key: &str, value: &str) -> (String, usize) {
    let occurrences = key_occurrences(text, key);
    if occurrences.is_empty() {
        return (text.to_string(), 0);
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for &(start, end) in &occurrences {
        out.push_str(&text[last..start]);
        out.push_str(value);
        last = end;
    }
    out.push_str(&text[last..]);

    (out, occurrences.len())
}
