//! Stable multi-mode note ordering.
//!
//! # Invariants
//! - Sorting never reorders the caller's collection; a new sequence is built.
//! - Notes with equal keys keep their input order in every mode, including
//!   the descending ones.
//! - Timestamps compare exactly as integers.
//! - Titles compare by the Unicode Collation Algorithm at secondary strength:
//!   case never matters, letters such as `ł` or `ø` sit next to their Latin
//!   neighbours, and accents only break ties.

use super::{ensure_well_formed, QueryResult};
use crate::model::note::Note;
use icu_collator::{Collator, CollatorOptions, Strength};
use log::warn;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Selectable result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// `created_at` descending.
    #[default]
    NewestFirst,
    /// `created_at` ascending.
    OldestFirst,
    /// Title alphabetical, case-insensitive.
    TitleAsc,
    /// Title reverse alphabetical, case-insensitive.
    TitleDesc,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::NewestFirst,
        SortMode::OldestFirst,
        SortMode::TitleAsc,
        SortMode::TitleDesc,
    ];

    /// Stable identifier used by CLI flags and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewestFirst => "newest-first",
            Self::OldestFirst => "oldest-first",
            Self::TitleAsc => "title-asc",
            Self::TitleDesc => "title-desc",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sort mode identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortModeError(String);

impl Display for ParseSortModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported sort mode `{}`; expected newest-first|oldest-first|title-asc|title-desc",
            self.0
        )
    }
}

impl Error for ParseSortModeError {}

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ParseSortModeError(value.trim().to_string()))
    }
}

/// Returns `notes` ordered by `mode` as a new sequence.
///
/// # Errors
/// - `QueryError` when a supplied note is malformed.
pub fn sort_notes<'a, I>(notes: I, mode: SortMode) -> QueryResult<Vec<&'a Note>>
where
    I: IntoIterator<Item = &'a Note>,
{
    let mut sorted = ensure_well_formed(notes)?;
    match mode {
        // `sort_by` is stable; comparing `b` to `a` keeps ties in input order.
        SortMode::NewestFirst => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::OldestFirst => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::TitleAsc | SortMode::TitleDesc => {
            let collator = TitleCollator::new();
            if mode == SortMode::TitleAsc {
                sorted.sort_by(|a, b| collator.compare(&a.title, &b.title));
            } else {
                sorted.sort_by(|a, b| collator.compare(&b.title, &a.title));
            }
        }
    }
    Ok(sorted)
}

/// Compares two titles the way a human alphabetizer would.
///
/// Case never matters. Base letters decide first; accents only break ties
/// between otherwise equal titles.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TitleCollator::new().compare(a, b)
}

/// Root-locale collator, or the decomposed-key comparison when collation
/// data cannot be loaded.
struct TitleCollator {
    collator: Option<Collator>,
}

impl TitleCollator {
    fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        let collator = match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(err) => {
                warn!("event=collator_init module=search status=fallback error={err}");
                None
            }
        };
        Self { collator }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => DecomposedKey::new(a).cmp(&DecomposedKey::new(b)),
        }
    }
}

// Lowercased NFD with combining marks stripped, then with them kept.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct DecomposedKey {
    base: String,
    accented: String,
}

impl DecomposedKey {
    fn new(title: &str) -> Self {
        let accented = title
            .chars()
            .flat_map(char::to_lowercase)
            .nfd()
            .collect::<String>();
        let base = accented
            .chars()
            .filter(|ch| !is_combining_mark(*ch))
            .collect();
        Self { base, accented }
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_titles, DecomposedKey, SortMode};
    use std::cmp::Ordering;

    #[test]
    fn compare_titles_ignores_case() {
        assert_eq!(compare_titles("apple", "APPLE"), Ordering::Equal);
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
    }

    #[test]
    fn compare_titles_places_accents_next_to_base_letters() {
        assert_eq!(compare_titles("éclair", "fig"), Ordering::Less);
        assert_eq!(compare_titles("resume", "résumé"), Ordering::Less);
        assert_eq!(compare_titles("résumé", "resumes"), Ordering::Less);
    }

    #[test]
    fn compare_titles_keeps_stroke_letters_beside_their_latin_neighbours() {
        assert_eq!(compare_titles("Lemon", "Łódź"), Ordering::Less);
        assert_eq!(compare_titles("Łódź", "Mango"), Ordering::Less);
        assert_eq!(compare_titles("Øresund", "Pear"), Ordering::Less);
        assert_eq!(compare_titles("Đakovo", "Eel"), Ordering::Less);
    }

    #[test]
    fn decomposed_key_orders_accents_after_base_letters() {
        assert!(DecomposedKey::new("resume") < DecomposedKey::new("Résumé"));
        assert_eq!(DecomposedKey::new("APPLE"), DecomposedKey::new("apple"));
    }

    #[test]
    fn sort_mode_parses_identifiers() {
        assert_eq!("title-asc".parse::<SortMode>().unwrap(), SortMode::TitleAsc);
        assert_eq!(
            " Newest_First ".parse::<SortMode>().unwrap(),
            SortMode::NewestFirst
        );
        assert!("random".parse::<SortMode>().is_err());
    }

    #[test]
    fn sort_mode_round_trips_display() {
        for mode in SortMode::ALL {
            assert_eq!(mode.to_string().parse::<SortMode>().unwrap(), mode);
        }
    }
}
