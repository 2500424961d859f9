//! Query orchestration: filter, then sort, then project for display.
//!
//! # Responsibility
//! - Compose `filter_notes` and `sort_notes` into one recomputation.
//! - Derive highlighted title and content preview per result.
//!
//! # Invariants
//! - Filtering always precedes sorting; sort mode never changes membership.
//! - Content previews are truncated before highlighting, so no marker can be
//!   cut in half and matches past the preview window are never shown.
//! - Identical inputs produce identical outputs; nothing is cached.

use super::filter::filter_notes;
use super::highlight::Highlighter;
use super::sort::{sort_notes, SortMode};
use super::{normalize_query, QueryResult};
use crate::model::note::Note;
use log::debug;
use std::time::Instant;

/// Characters of content kept in a result preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 200;
/// Appended to escaped previews whose content was cut.
pub const TRUNCATION_SUFFIX: &str = "...";

/// Transient (search query, sort mode) pair driving a recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub search_query: String,
    pub sort_mode: SortMode,
}

impl QueryState {
    pub fn new(search_query: impl Into<String>, sort_mode: SortMode) -> Self {
        Self {
            search_query: search_query.into(),
            sort_mode,
        }
    }

    /// Returns whether the query narrows the collection.
    pub fn is_search_active(&self) -> bool {
        !normalize_query(&self.search_query).is_empty()
    }
}

/// Display options for result projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum content characters kept before highlighting.
    pub preview_chars: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// One result row: the raw note plus escaped, highlighted display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub note: Note,
    /// Escaped title with matches wrapped in highlight markers.
    pub title_html: String,
    /// Escaped, truncated content with matches wrapped in highlight markers.
    pub preview_html: String,
    pub is_edited: bool,
    /// Whether content was cut to fit the preview window.
    pub is_truncated: bool,
}

/// Published result of one recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Ordered, highlighted result rows.
    pub items: Vec<NoteView>,
    /// Size of the supplied collection.
    pub total: usize,
    pub sort_mode: SortMode,
    pub search_active: bool,
}

impl QueryOutcome {
    /// Number of notes that survived filtering.
    pub fn matched(&self) -> usize {
        self.items.len()
    }

    /// Returns whether an active search excluded every note.
    pub fn is_empty_search(&self) -> bool {
        self.search_active && self.items.is_empty() && self.total > 0
    }
}

/// Returns `sort(filter(notes, search_query), sort_mode)`.
///
/// # Errors
/// - `QueryError` when a supplied note is malformed.
pub fn query_notes<'a>(
    notes: &'a [Note],
    search_query: &str,
    sort_mode: SortMode,
) -> QueryResult<Vec<&'a Note>> {
    let filtered = filter_notes(notes, search_query)?;
    sort_notes(filtered, sort_mode)
}

/// Runs one full recomputation with default display options.
pub fn run_query(notes: &[Note], state: &QueryState) -> QueryResult<QueryOutcome> {
    run_query_with(notes, state, &QueryOptions::default())
}

/// Runs one full recomputation and projects display fields.
///
/// # Errors
/// - `QueryError` when a supplied note is malformed; no partial result is
///   returned.
pub fn run_query_with(
    notes: &[Note],
    state: &QueryState,
    options: &QueryOptions,
) -> QueryResult<QueryOutcome> {
    let started_at = Instant::now();
    let ordered = query_notes(notes, &state.search_query, state.sort_mode)?;
    let highlighter = Highlighter::new(&state.search_query);
    let items = ordered
        .into_iter()
        .map(|note| project_note(note, &highlighter, options))
        .collect::<Vec<_>>();

    let outcome = QueryOutcome {
        total: notes.len(),
        sort_mode: state.sort_mode,
        search_active: state.is_search_active(),
        items,
    };
    debug!(
        "event=query_run module=search status=ok total={} matched={} sort={} query_chars={} duration_us={}",
        outcome.total,
        outcome.matched(),
        outcome.sort_mode,
        normalize_query(&state.search_query).chars().count(),
        started_at.elapsed().as_micros()
    );
    Ok(outcome)
}

fn project_note(note: &Note, highlighter: &Highlighter, options: &QueryOptions) -> NoteView {
    let (preview, is_truncated) = truncate_chars(&note.content, options.preview_chars);
    let mut preview_html = highlighter.highlight(preview);
    if is_truncated {
        preview_html.push_str(TRUNCATION_SUFFIX);
    }

    NoteView {
        title_html: highlighter.highlight(&note.title),
        preview_html,
        is_edited: note.is_edited(),
        is_truncated,
        note: note.clone(),
    }
}

/// Returns the first `max_chars` characters of `text` and whether it was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => (&text[..byte_offset], true),
        None => (text, false),
    }
}
