//! Note collection store contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Load and save the whole note collection as one JSON record.
//! - Translate storage failures into `CorruptData` / `StorageFull`.
//!
//! # Invariants
//! - A missing record loads as an empty collection.
//! - Loaded records pass structural validation and carry unique IDs;
//!   anything else is reported as corrupt, never repaired.
//! - A payload larger than the quota is rejected before any write.

use crate::db::DbError;
use crate::model::note::Note;
use log::{error, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key under which the collection is stored.
pub const NOTES_KEY: &str = "notes";
/// Default payload cap, in the range browsers give local key-value storage.
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage collaborator error.
#[derive(Debug)]
pub enum StoreError {
    /// Stored bytes are not a valid list of note records.
    CorruptData(String),
    /// Payload does not fit the configured quota or the disk is full.
    StorageFull { bytes: usize, quota: usize },
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptData(message) => write!(f, "corrupt note data: {message}"),
            Self::StorageFull { bytes, quota } => write!(
                f,
                "storage full: payload of {bytes} bytes exceeds quota of {quota} bytes"
            ),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::CorruptData(_) | Self::StorageFull { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for the note collection.
pub trait NoteStore {
    /// Loads the full collection in stored order.
    fn load(&self) -> StoreResult<Vec<Note>>;
    /// Replaces the stored collection.
    fn save(&self, notes: &[Note]) -> StoreResult<()>;
}

impl<S: NoteStore + ?Sized> NoteStore for &S {
    fn load(&self) -> StoreResult<Vec<Note>> {
        (**self).load()
    }

    fn save(&self, notes: &[Note]) -> StoreResult<()> {
        (**self).save(notes)
    }
}

/// SQLite-backed store over the `kv_store` table.
pub struct SqliteNoteStore<'conn> {
    conn: &'conn Connection,
    quota_bytes: usize,
}

impl<'conn> SqliteNoteStore<'conn> {
    /// Constructs a store from a migrated connection with the default quota.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_quota(conn, DEFAULT_STORAGE_QUOTA_BYTES)
    }

    pub fn with_quota(conn: &'conn Connection, quota_bytes: usize) -> Self {
        Self { conn, quota_bytes }
    }

    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn load(&self) -> StoreResult<Vec<Note>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [NOTES_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            info!("event=store_load module=repo status=ok notes=0 source=empty");
            return Ok(Vec::new());
        };

        match decode_notes(&raw) {
            Ok(notes) => {
                info!(
                    "event=store_load module=repo status=ok notes={} bytes={}",
                    notes.len(),
                    raw.len()
                );
                Ok(notes)
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=corrupt_data bytes={}",
                    raw.len()
                );
                Err(err)
            }
        }
    }

    fn save(&self, notes: &[Note]) -> StoreResult<()> {
        let payload = encode_notes(notes)?;
        if payload.len() > self.quota_bytes {
            warn!(
                "event=store_save module=repo status=error error_code=storage_full bytes={} quota={}",
                payload.len(),
                self.quota_bytes
            );
            return Err(StoreError::StorageFull {
                bytes: payload.len(),
                quota: self.quota_bytes,
            });
        }

        let written = self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![NOTES_KEY, payload.as_str()],
        );

        match written {
            Ok(_) => {
                info!(
                    "event=store_save module=repo status=ok notes={} bytes={}",
                    notes.len(),
                    payload.len()
                );
                Ok(())
            }
            Err(err) => {
                let err = DbError::from(err);
                error!(
                    "event=store_save module=repo status=error bytes={} error={}",
                    payload.len(),
                    err
                );
                if err.is_storage_full() {
                    return Err(StoreError::StorageFull {
                        bytes: payload.len(),
                        quota: self.quota_bytes,
                    });
                }
                Err(err.into())
            }
        }
    }
}

/// Serializes the collection into the stored JSON payload.
pub fn encode_notes(notes: &[Note]) -> StoreResult<String> {
    serde_json::to_string(notes)
        .map_err(|err| StoreError::CorruptData(format!("failed to encode notes: {err}")))
}

/// Parses and checks a stored JSON payload.
///
/// # Errors
/// - `CorruptData` when the payload is not a JSON list of note records, a
///   record fails structural validation, or an ID repeats.
pub fn decode_notes(raw: &str) -> StoreResult<Vec<Note>> {
    let notes: Vec<Note> = serde_json::from_str(raw)
        .map_err(|err| StoreError::CorruptData(format!("invalid note records: {err}")))?;

    let mut seen = HashSet::with_capacity(notes.len());
    for (index, note) in notes.iter().enumerate() {
        note.validate_shape().map_err(|err| {
            StoreError::CorruptData(format!("record {index} ({}) is invalid: {err}", note.id))
        })?;
        if !seen.insert(note.id) {
            return Err(StoreError::CorruptData(format!(
                "record {index} repeats id {}",
                note.id
            )));
        }
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::{decode_notes, encode_notes, StoreError};
    use crate::model::note::Note;

    #[test]
    fn decode_accepts_encoded_collection() {
        let notes = vec![Note::new("a", "b", 1), Note::new("c", "d", 2)];
        let payload = encode_notes(&notes).unwrap();
        assert_eq!(decode_notes(&payload).unwrap(), notes);
    }

    #[test]
    fn decode_rejects_records_missing_text_fields() {
        let payload = r#"[{"id":"11111111-2222-4333-8444-555555555555","title":7,"content":"x","createdAt":1,"updatedAt":1}]"#;
        let err = decode_notes(payload).unwrap_err();
        assert!(matches!(err, StoreError::CorruptData(_)));
    }

    #[test]
    fn decode_rejects_non_list_payload() {
        let err = decode_notes(r#"{"notes": []}"#).unwrap_err();
        assert!(matches!(err, StoreError::CorruptData(_)));
    }

    #[test]
    fn decode_rejects_repeated_ids() {
        let note = Note::new("a", "b", 1);
        let payload = encode_notes(&[note.clone(), note]).unwrap();
        let err = decode_notes(&payload).unwrap_err();
        assert!(err.to_string().contains("repeats id"));
    }
}
