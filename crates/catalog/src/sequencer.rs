use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::{ProviderRecord, ProviderSource, QueryFailure, SearchQuery, SearchService};

/// Identifies one issued search. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The response belongs to the most recently issued search.
    Current(T),
    /// A newer search was issued before this one resolved.
    Stale,
}

impl<T> Resolution<T> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Resolution::Stale)
    }

    pub fn current(self) -> Option<T> {
        match self {
            Resolution::Current(value) => Some(value),
            Resolution::Stale => None,
        }
    }
}

/// Monotonic request counter used to drop responses to superseded searches.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued ticket, if any.
    pub fn latest(&self) -> Option<SearchTicket> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            id => Some(SearchTicket(id)),
        }
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    pub fn resolve<T>(&self, ticket: SearchTicket, value: T) -> Resolution<T> {
        if self.is_current(ticket) {
            Resolution::Current(value)
        } else {
            debug!(ticket = ticket.0, "discarding stale search response");
            Resolution::Stale
        }
    }
}

#[derive(Default)]
struct Shown {
    ticket: Option<SearchTicket>,
    records: Option<Vec<ProviderRecord>>,
}

/// A search view that only ever shows the response to the latest query.
pub struct SequencedSearch<S: ?Sized> {
    service: SearchService<S>,
    sequencer: SearchSequencer,
    shown: Mutex<Shown>,
}

impl<S: ProviderSource + ?Sized> SequencedSearch<S> {
    pub fn new(service: SearchService<S>) -> Self {
        Self {
            service,
            sequencer: SearchSequencer::new(),
            shown: Mutex::new(Shown::default()),
        }
    }

    /// Runs `query`; the outcome is applied to [`Self::results`] only if no
    /// newer query was submitted meanwhile. A failure clears the results.
    pub async fn submit(
        &self,
        query: &SearchQuery,
    ) -> Resolution<Result<Vec<ProviderRecord>, QueryFailure>> {
        let ticket = self.sequencer.issue();
        let outcome = self.service.search(query).await;

        // The staleness check and the write happen under the same lock.
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        let resolution = self.sequencer.resolve(ticket, outcome);
        if let Resolution::Current(outcome) = &resolution {
            shown.ticket = Some(ticket);
            shown.records = outcome.as_ref().ok().cloned();
        }
        resolution
    }

    /// Results of the latest resolved query, `None` before the first one or after a failure.
    pub fn results(&self) -> Option<Vec<ProviderRecord>> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .clone()
    }

    /// Ticket of the query whose outcome [`Self::results`] reflects.
    pub fn shown_ticket(&self) -> Option<SearchTicket> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .ticket
    }

    /// Ticket of the most recently submitted query.
    pub fn latest_ticket(&self) -> Option<SearchTicket> {
        self.sequencer.latest()
    }
}
