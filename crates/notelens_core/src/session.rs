//! Event → recompute → publish pipeline around the query engine.
//!
//! # Responsibility
//! - Hold the transient query state next to the note service.
//! - Apply one event at a time and publish a freshly computed result.
//! - Debounce keystrokes before they become query changes.
//!
//! # Invariants
//! - Every published result is recomputed from scratch for the current
//!   collection and query state.
//! - A failed mutation publishes nothing and leaves query state unchanged.
//! - Debouncing only delays events; it never changes what a recomputation
//!   returns for a given state.

use crate::clock::Clock;
use crate::model::note::NoteId;
use crate::repo::note_store::NoteStore;
use crate::search::engine::{QueryOptions, QueryOutcome, QueryState};
use crate::search::sort::SortMode;
use crate::service::note_service::{NoteService, ServiceResult};
use log::debug;
use std::time::{Duration, Instant};

/// Default quiet period before a typed query is applied.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// State changes that trigger a recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SetQuery(String),
    SetSortMode(SortMode),
    CreateNote { title: String, content: String },
    UpdateNote { id: NoteId, title: String, content: String },
    DeleteNote(NoteId),
    /// Recompute without changing anything.
    Refresh,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::SetQuery(_) => "set_query",
            Self::SetSortMode(_) => "set_sort_mode",
            Self::CreateNote { .. } => "create_note",
            Self::UpdateNote { .. } => "update_note",
            Self::DeleteNote(_) => "delete_note",
            Self::Refresh => "refresh",
        }
    }
}

/// Trailing-edge debouncer for search input.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a keystroke; replaces any pending query and restarts the wait.
    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now));
    }

    /// Releases the pending query once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.delay);
        if ready {
            self.pending.take().map(|(query, _)| query)
        } else {
            None
        }
    }

    /// Releases the pending query immediately.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(query, _)| query)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Note service plus query state, recomputed on every event.
pub struct QuerySession<S: NoteStore, C: Clock> {
    service: NoteService<S, C>,
    state: QueryState,
    options: QueryOptions,
    debouncer: SearchDebouncer,
}

impl<S: NoteStore, C: Clock> QuerySession<S, C> {
    pub fn new(service: NoteService<S, C>) -> Self {
        Self {
            service,
            state: QueryState::default(),
            options: QueryOptions::default(),
            debouncer: SearchDebouncer::default(),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_debouncer(mut self, debouncer: SearchDebouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn service(&self) -> &NoteService<S, C> {
        &self.service
    }

    /// Applies one event and publishes the recomputed result.
    ///
    /// # Errors
    /// - Service, store or query errors, surfaced unchanged.
    pub fn apply(&mut self, event: SessionEvent) -> ServiceResult<QueryOutcome> {
        let name = event.name();
        match event {
            SessionEvent::SetQuery(query) => self.state.search_query = query,
            SessionEvent::SetSortMode(mode) => self.state.sort_mode = mode,
            SessionEvent::CreateNote { title, content } => {
                self.service.create_note(title, content)?;
            }
            SessionEvent::UpdateNote { id, title, content } => {
                self.service.update_note(id, title, content)?;
            }
            SessionEvent::DeleteNote(id) => {
                self.service.delete_note(id)?;
            }
            SessionEvent::Refresh => {}
        }

        let outcome = self.service.query(&self.state, &self.options)?;
        debug!(
            "event=session_publish module=session status=ok trigger={name} matched={} total={}",
            outcome.matched(),
            outcome.total
        );
        Ok(outcome)
    }

    /// Records a search keystroke without recomputing.
    pub fn type_query(&mut self, query: impl Into<String>, now: Instant) {
        self.debouncer.input(query, now);
    }

    /// Applies a debounced query once it is due.
    ///
    /// Returns `Ok(None)` while input is still settling or nothing is pending.
    pub fn tick(&mut self, now: Instant) -> ServiceResult<Option<QueryOutcome>> {
        match self.debouncer.poll(now) {
            Some(query) => self.apply(SessionEvent::SetQuery(query)).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SearchDebouncer;
    use std::time::{Duration, Instant};

    #[test]
    fn debouncer_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(300));
        debouncer.input("m", start);
        debouncer.input("mi", start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(400)),
            Some("mi".to_string())
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn flush_releases_immediately() {
        let mut debouncer = SearchDebouncer::default();
        debouncer.input("milk", Instant::now());
        assert_eq!(debouncer.flush(), Some("milk".to_string()));
        assert_eq!(debouncer.flush(), None);
    }
}
