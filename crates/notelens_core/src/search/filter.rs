//! Case-insensitive substring filter over title and content.

use super::matcher::LiteralMatcher;
use super::{ensure_well_formed, normalize_query, QueryResult};
use crate::model::note::Note;

/// Returns the notes whose title or content contains `query`.
///
/// An empty (after trimming) query selects every note. Surviving notes keep
/// their relative input order.
///
/// # Errors
/// - `QueryError` when a supplied note is malformed.
pub fn filter_notes<'a, I>(notes: I, query: &str) -> QueryResult<Vec<&'a Note>>
where
    I: IntoIterator<Item = &'a Note>,
{
    let checked = ensure_well_formed(notes)?;
    let query = normalize_query(query);
    if query.is_empty() {
        return Ok(checked);
    }

    let matcher = LiteralMatcher::new(query);
    Ok(checked
        .into_iter()
        .filter(|note| note_matches(&matcher, note))
        .collect())
}

fn note_matches(matcher: &LiteralMatcher, note: &Note) -> bool {
    matcher.is_match(&note.title) || matcher.is_match(&note.content)
}

#[cfg(test)]
mod tests {
    use super::filter_notes;
    use crate::model::note::Note;

    #[test]
    fn matches_title_or_content_ignoring_case() {
        let notes = vec![
            Note::new("Groceries", "eggs", 1),
            Note::new("Work", "call MILKMAN", 2),
            Note::new("Ideas", "none", 3),
        ];
        let hits = filter_notes(&notes, "milk").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, notes[1].id);

        let hits = filter_notes(&notes, "GROC").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, notes[0].id);
    }

    #[test]
    fn metacharacters_are_literal() {
        let notes = vec![Note::new("a+b", "x", 1), Note::new("aab", "x", 2)];
        let hits = filter_notes(&notes, "a+b").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "a+b");
    }
}
