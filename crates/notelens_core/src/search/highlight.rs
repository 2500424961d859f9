//! Escaping and match highlighting for display text.
//!
//! # Responsibility
//! - Neutralize HTML-significant characters with an explicit entity table.
//! - Wrap every case-insensitive occurrence of the query in a highlight marker.
//!
//! # Invariants
//! - Output never contains unescaped text from either `text` or `query`.
//! - Escaping always happens, whether or not the query matches.
//! - Matches are leftmost-first and non-overlapping.
//! - A match always covers whole escaped characters; the escaped query can
//!   never match inside an entity such as `&amp;`.

use super::matcher::LiteralMatcher;
use super::normalize_query;

/// Opening highlight marker.
pub const MARK_OPEN: &str = "<mark>";
/// Closing highlight marker.
pub const MARK_CLOSE: &str = "</mark>";

const ENTITY_TABLE: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#39;"),
];

/// Escapes `&`, `<`, `>`, `"` and `'` into their entity equivalents.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match entity_for(ch) {
            Some(entity) => out.push_str(entity),
            None => out.push(ch),
        }
    }
}

fn entity_for(ch: char) -> Option<&'static str> {
    ENTITY_TABLE
        .iter()
        .find(|(raw, _)| *raw == ch)
        .map(|(_, entity)| *entity)
}

/// Escapes `text` and highlights every occurrence of `query`.
///
/// Builds a matcher per call; use [`Highlighter`] to reuse one across many
/// fields for the same query.
pub fn highlight(text: &str, query: &str) -> String {
    Highlighter::new(query).highlight(text)
}

/// Highlighter bound to one query.
#[derive(Debug)]
pub struct Highlighter {
    matcher: Option<LiteralMatcher>,
}

impl Highlighter {
    /// Creates a highlighter; an empty (after trimming) query only escapes.
    pub fn new(query: &str) -> Self {
        let query = normalize_query(query);
        let matcher = if query.is_empty() {
            None
        } else {
            Some(LiteralMatcher::new(query))
        };
        Self { matcher }
    }

    /// Returns escaped `text` with matches wrapped in [`MARK_OPEN`]/[`MARK_CLOSE`].
    ///
    /// Escaping is a per-character substitution, so an occurrence of the
    /// escaped query in the escaped text that starts and ends on escaped
    /// character boundaries corresponds to exactly one occurrence of the raw
    /// query in the raw text. Matching the raw text and escaping each segment
    /// yields that output without ever splitting an entity.
    pub fn highlight(&self, text: &str) -> String {
        let Some(matcher) = self.matcher.as_ref() else {
            return escape_html(text);
        };

        let mut out = String::with_capacity(text.len() + MARK_OPEN.len() + MARK_CLOSE.len());
        let mut last_end = 0;
        for range in matcher.find_ranges(text) {
            if range.is_empty() {
                continue;
            }
            push_escaped(&mut out, &text[last_end..range.start]);
            out.push_str(MARK_OPEN);
            push_escaped(&mut out, &text[range.start..range.end]);
            out.push_str(MARK_CLOSE);
            last_end = range.end;
        }
        push_escaped(&mut out, &text[last_end..]);
        out
    }
}
