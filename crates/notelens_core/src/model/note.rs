//! Note domain model.
//!
//! # Responsibility
//! - Define the record produced by the mutation layer and read by the query
//!   engine.
//! - Provide field validation with configurable length caps.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `title` and `content` are non-empty after trimming.
//! - `updated_at` is never earlier than `created_at`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = Uuid;

pub const DEFAULT_MAX_TITLE_CHARS: usize = 100;
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 10_000;

/// Length caps applied by [`Note::validate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteLimits {
    pub max_title_chars: usize,
    pub max_content_chars: usize,
}

impl Default for NoteLimits {
    fn default() -> Self {
        Self {
            max_title_chars: DEFAULT_MAX_TITLE_CHARS,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

/// Validation failure for note fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyContent,
    TitleTooLong { max: usize, actual: usize },
    ContentTooLong { max: usize, actual: usize },
    /// `updated_at` is earlier than `created_at`.
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::EmptyContent => write!(f, "note content must not be empty"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "note title has {actual} characters; limit is {max}")
            }
            Self::ContentTooLong { max, actual } => {
                write!(f, "note content has {actual} characters; limit is {max}")
            }
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "note updated_at {updated_at} is earlier than created_at {created_at}"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Canonical note record.
///
/// Timestamps are Unix epoch milliseconds and are compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    /// Creates a note with a generated ID and `created_at == updated_at == now_ms`.
    pub fn new(title: impl Into<String>, content: impl Into<String>, now_ms: i64) -> Self {
        Self::with_id(Uuid::new_v4(), title, content, now_ms)
    }

    /// Creates a note with a caller-provided ID.
    ///
    /// Used by import paths and fixtures where identity already exists.
    pub fn with_id(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Returns whether the note was changed after creation.
    pub fn is_edited(&self) -> bool {
        self.updated_at != self.created_at
    }

    /// Validates fields against the default length caps.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        self.validate_with(&NoteLimits::default())
    }

    /// Validates fields against caller-provided length caps.
    ///
    /// Lengths are counted in Unicode scalar values, not bytes.
    pub fn validate_with(&self, limits: &NoteLimits) -> Result<(), NoteValidationError> {
        self.validate_shape()?;

        let title_chars = self.title.chars().count();
        if title_chars > limits.max_title_chars {
            return Err(NoteValidationError::TitleTooLong {
                max: limits.max_title_chars,
                actual: title_chars,
            });
        }

        let content_chars = self.content.chars().count();
        if content_chars > limits.max_content_chars {
            return Err(NoteValidationError::ContentTooLong {
                max: limits.max_content_chars,
                actual: content_chars,
            });
        }

        Ok(())
    }

    /// Validates the structural fields only, ignoring length caps.
    ///
    /// This is the check the query engine applies to supplied notes.
    pub fn validate_shape(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}
