//! Persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the storage collaborator contract used by the note service.
//! - Isolate SQLite and payload encoding details from the service layer.
//!
//! # Invariants
//! - Storage errors are reported, never retried or repaired here.

pub mod note_store;
