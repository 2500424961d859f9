//! Domain model for locally persisted notes.
//!
//! # Responsibility
//! - Define the canonical note record shared by storage, service and query.
//! - Own field validation rules used by every write path.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - `updated_at >= created_at` for every valid note.

pub mod note;
