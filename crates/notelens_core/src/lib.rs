//! Core domain logic for NoteLens.
//! The query engine in `search` is pure; storage, mutation and session
//! layers around it supply the collection and query state.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod session;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NoteLimits, NoteValidationError};
pub use repo::note_store::{NoteStore, SqliteNoteStore, StoreError, StoreResult};
pub use search::engine::{
    query_notes, run_query, run_query_with, NoteView, QueryOptions, QueryOutcome, QueryState,
};
pub use search::filter::filter_notes;
pub use search::highlight::{escape_html, highlight, Highlighter, MARK_CLOSE, MARK_OPEN};
pub use search::sort::{compare_titles, sort_notes, ParseSortModeError, SortMode};
pub use search::{QueryError, QueryResult};
pub use service::note_service::{NoteService, NoteServiceError, ServiceResult};
pub use session::{QuerySession, SearchDebouncer, SessionEvent};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
