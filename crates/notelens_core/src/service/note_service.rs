//! Note mutation service.
//!
//! # Responsibility
//! - Own the live note collection and every create/update/delete on it.
//! - Assign IDs and timestamps; validate fields before persistence.
//! - Hand the current collection to the query engine on request.
//!
//! # Invariants
//! - Title and content are trimmed before validation and storage.
//! - `updated_at` changes only when title or content actually change, and is
//!   never set earlier than `created_at`.
//! - A failed save leaves the in-memory collection exactly as it was.

use crate::clock::{Clock, SystemClock};
use crate::model::note::{Note, NoteId, NoteLimits, NoteValidationError};
use crate::repo::note_store::{NoteStore, StoreError};
use crate::search::engine::{run_query_with, QueryOptions, QueryOutcome, QueryState};
use crate::search::QueryError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Input fields fail validation.
    Validation(NoteValidationError),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Storage collaborator failure, surfaced unchanged.
    Store(StoreError),
    /// Query engine rejected the collection.
    Query(QueryError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NoteNotFound(_) => None,
            Self::Store(err) => Some(err),
            Self::Query(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<QueryError> for NoteServiceError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Note service over a store and a clock.
pub struct NoteService<S: NoteStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    limits: NoteLimits,
    notes: Vec<Note>,
}

impl<S: NoteStore> NoteService<S, SystemClock> {
    /// Loads the collection from `store` using the system clock.
    pub fn open(store: S) -> ServiceResult<Self> {
        Self::open_with_clock(store, SystemClock)
    }
}

impl<S: NoteStore, C: Clock> NoteService<S, C> {
    /// Loads the collection from `store` using a caller-provided clock.
    pub fn open_with_clock(store: S, clock: C) -> ServiceResult<Self> {
        let notes = store.load()?;
        Ok(Self {
            store,
            clock,
            limits: NoteLimits::default(),
            notes,
        })
    }

    /// Replaces the length caps applied to create/update input.
    pub fn with_limits(mut self, limits: NoteLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Read-only view of the live collection, in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Gets one note by stable ID.
    pub fn get_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Creates one note and persists the collection.
    pub fn create_note(
        &mut self,
        title: impl AsRef<str>,
        content: impl AsRef<str>,
    ) -> ServiceResult<Note> {
        let now = self.clock.now_ms();
        let mut note = Note::new(title.as_ref().trim(), content.as_ref().trim(), now);
        note.validate_with(&self.limits)?;
        while self.position(note.id).is_some() {
            note.id = Uuid::new_v4();
        }

        self.notes.push(note.clone());
        if let Err(err) = self.store.save(&self.notes) {
            self.notes.pop();
            warn!("event=note_create module=service status=error error={err}");
            return Err(err.into());
        }

        info!(
            "event=note_create module=service status=ok note_id={} title_chars={} content_chars={}",
            note.id,
            note.title.chars().count(),
            note.content.chars().count()
        );
        Ok(note)
    }

    /// Replaces title and content of one note and persists the collection.
    ///
    /// An edit that changes nothing keeps `updated_at` and skips the save.
    pub fn update_note(
        &mut self,
        id: NoteId,
        title: impl AsRef<str>,
        content: impl AsRef<str>,
    ) -> ServiceResult<Note> {
        let index = self
            .position(id)
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        let previous = self.notes[index].clone();

        let mut updated = previous.clone();
        updated.title = title.as_ref().trim().to_string();
        updated.content = content.as_ref().trim().to_string();
        if updated.title == previous.title && updated.content == previous.content {
            return Ok(previous);
        }
        updated.updated_at = self.clock.now_ms().max(previous.created_at);
        updated.validate_with(&self.limits)?;

        self.notes[index] = updated.clone();
        if let Err(err) = self.store.save(&self.notes) {
            self.notes[index] = previous;
            warn!("event=note_update module=service status=error note_id={id} error={err}");
            return Err(err.into());
        }

        info!("event=note_update module=service status=ok note_id={id}");
        Ok(updated)
    }

    /// Removes one note and persists the collection.
    pub fn delete_note(&mut self, id: NoteId) -> ServiceResult<Note> {
        let index = self
            .position(id)
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        let removed = self.notes.remove(index);

        if let Err(err) = self.store.save(&self.notes) {
            self.notes.insert(index, removed);
            warn!("event=note_delete module=service status=error note_id={id} error={err}");
            return Err(err.into());
        }

        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(removed)
    }

    /// Runs the query engine over the live collection.
    pub fn query(&self, state: &QueryState, options: &QueryOptions) -> ServiceResult<QueryOutcome> {
        Ok(run_query_with(&self.notes, state, options)?)
    }

    fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }
}
