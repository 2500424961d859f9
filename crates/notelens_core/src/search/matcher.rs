//! Literal, case-insensitive substring matcher shared by filter and highlight.
//!
//! The query is always treated as literal text: regex metacharacters are
//! escaped before the pattern is compiled. Case folding is Unicode simple case
//! folding, which does not depend on the process locale.
//!
//! The folded scan used when the pattern cannot be compiled maps every char
//! through its one-to-one lowercase form, so it never expands a char the way
//! full lowercasing does (`İ` stays a single char). Letters whose simple
//! folding is not their lowercase form (`ς` and `σ`, for example) still
//! compare unequal there.

use log::warn;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

// Generous compile budget; queries long enough to exceed it fall back to
// the folded scan below.
const MATCHER_SIZE_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug)]
pub(crate) enum LiteralMatcher {
    Pattern(Regex),
    Folded(Vec<char>),
}

impl LiteralMatcher {
    /// Builds a matcher for an already-normalized, non-empty query.
    pub(crate) fn new(query: &str) -> Self {
        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .size_limit(MATCHER_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => Self::Pattern(regex),
            Err(err) => {
                warn!(
                    "event=matcher_build module=search status=fallback query_len={} error={}",
                    query.chars().count(),
                    err
                );
                Self::Folded(fold(query).collect())
            }
        }
    }

    pub(crate) fn is_match(&self, haystack: &str) -> bool {
        match self {
            Self::Pattern(regex) => regex.is_match(haystack),
            Self::Folded(_) => self.find_ranges(haystack).next().is_some(),
        }
    }

    /// Returns leftmost-first, non-overlapping match byte ranges.
    pub(crate) fn find_ranges<'m, 'h>(
        &'m self,
        haystack: &'h str,
    ) -> Box<dyn Iterator<Item = Range<usize>> + 'm>
    where
        'h: 'm,
    {
        match self {
            Self::Pattern(regex) => Box::new(regex.find_iter(haystack).map(|m| m.range())),
            Self::Folded(needle) => Box::new(FoldedScan {
                needle,
                haystack,
                cursor: 0,
            }),
        }
    }
}

fn fold(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().map(simple_fold)
}

// Lowercase form when it is a single char, else the char itself.
fn simple_fold(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}

struct FoldedScan<'m, 'h> {
    needle: &'m [char],
    haystack: &'h str,
    cursor: usize,
}

impl Iterator for FoldedScan<'_, '_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.needle.is_empty() {
            return None;
        }
        while self.cursor < self.haystack.len() {
            let start = self.cursor;
            if let Some(end) = self.match_at(start) {
                self.cursor = end;
                return Some(start..end);
            }
            let step = self.haystack[start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor = start + step;
        }
        None
    }
}

impl FoldedScan<'_, '_> {
    // Returns the end offset when the needle matches on whole source chars.
    fn match_at(&self, start: usize) -> Option<usize> {
        let mut matched = 0;
        for (offset, ch) in self.haystack[start..].char_indices() {
            if self.needle.get(matched) != Some(&simple_fold(ch)) {
                return None;
            }
            matched += 1;
            if matched == self.needle.len() {
                return Some(start + offset + ch.len_utf8());
            }
        }
        None
    }
}
