//! In-memory query engine over the note collection.
//!
//! # Responsibility
//! - Select notes matching a live search query (`filter`).
//! - Order notes by one of the supported sort modes (`sort`).
//! - Produce escaped, highlighted display text (`highlight`).
//! - Compose the three into one pure recomputation (`engine`).
//!
//! # Invariants
//! - Every entry point is pure: no state survives between calls and the
//!   supplied collection is never mutated or reordered in place.
//! - Malformed notes are rejected at entry with `QueryError`, never coerced.
//! - Queries containing any character are valid input.

use crate::model::note::{Note, NoteId, NoteValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod engine;
pub mod filter;
pub mod highlight;
mod matcher;
pub mod sort;

/// Result type for query engine APIs.
pub type QueryResult<T> = Result<T, QueryError>;

/// Query engine error for malformed collaborator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A supplied note fails structural validation.
    MalformedNote {
        id: NoteId,
        reason: NoteValidationError,
    },
    /// The same ID appears more than once in the supplied collection.
    DuplicateNoteId(NoteId),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedNote { id, reason } => write!(f, "malformed note {id}: {reason}"),
            Self::DuplicateNoteId(id) => write!(f, "duplicate note id in collection: {id}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedNote { reason, .. } => Some(reason),
            Self::DuplicateNoteId(_) => None,
        }
    }
}

/// Returns the query text the engine actually matches against.
///
/// Leading and trailing whitespace carry no meaning; a whitespace-only query
/// behaves like an empty one.
pub fn normalize_query(query: &str) -> &str {
    query.trim()
}

/// Checks every supplied note before any string operation runs on it.
pub(crate) fn ensure_well_formed<'a, I>(notes: I) -> QueryResult<Vec<&'a Note>>
where
    I: IntoIterator<Item = &'a Note>,
{
    let mut seen = HashSet::new();
    let mut checked = Vec::new();
    for note in notes {
        note.validate_shape()
            .map_err(|reason| QueryError::MalformedNote {
                id: note.id,
                reason,
            })?;
        if !seen.insert(note.id) {
            return Err(QueryError::DuplicateNoteId(note.id));
        }
        checked.push(note);
    }
    Ok(checked)
}

#[cfg(test)]
mod tests {
    use super::{ensure_well_formed, normalize_query, QueryError};
    use crate::model::note::Note;

    #[test]
    fn normalize_query_trims_whitespace() {
        assert_eq!(normalize_query("  milk \n"), "milk");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn guard_rejects_duplicate_ids() {
        let first = Note::new("a", "b", 1);
        let mut second = Note::new("c", "d", 2);
        second.id = first.id;

        let notes = vec![first.clone(), second];
        let err = ensure_well_formed(&notes).unwrap_err();
        assert_eq!(err, QueryError::DuplicateNoteId(first.id));
    }

    #[test]
    fn guard_preserves_input_order() {
        let notes = vec![Note::new("b", "x", 2), Note::new("a", "y", 1)];
        let checked = ensure_well_formed(&notes).unwrap();
        assert_eq!(checked[0].id, notes[0].id);
        assert_eq!(checked[1].id, notes[1].id);
    }
}
