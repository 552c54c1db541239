//! # Search Module
//!
//! Per-request search pipeline. [`SearchOrchestrator::handle_search`] trims the
//! raw input, records it in the client's history, performs the lookup and maps
//! the classified outcome to a user-facing [`SearchResult`].
//!
//! ## Flow
//!
//! ```text
//! raw word ──trim──► empty? ──yes──► EmptyQuery (no history, no lookup)
//!                      │
//!                      no
//!                      ▼
//!            HistoryStore::record
//!                      ▼
//!            DictionaryLookup::lookup ──► Found / NotFound / UpstreamError /
//!                                         DecodeFailed / LookupFailed
//! ```
//!
//! History is written before the lookup and is kept whatever the lookup returns.

use crate::dictionary::{DictionaryLookup, Entry, LookupOutcome};
use crate::history::HistoryStore;
use crate::session::ClientKey;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{info, warn};


/// Reasons a search produced no entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// Input was empty after trimming
    EmptyQuery,
    /// Transport-level failure reaching the upstream
    LookupFailed,
    /// Upstream answered 404
    NotFound,
    /// Upstream answered another non-success status
    UpstreamError,
    /// Upstream body could not be decoded
    DecodeFailed,
}

impl SearchFailure {
    /// Message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            SearchFailure::EmptyQuery => "Please enter a word",
            SearchFailure::NotFound => "Word not found. Please check your spelling and try again.",
            SearchFailure::LookupFailed | SearchFailure::UpstreamError => {
                "Failed to fetch dictionary data"
            }
            SearchFailure::DecodeFailed => "Failed to parse dictionary data",
        }
    }
}

impl Display for SearchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of one search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Found { query: String, entries: Vec<Entry> },
    Failed(SearchFailure),
}

impl SearchResult {
    pub fn failure(&self) -> Option<SearchFailure> {
        match self {
            SearchResult::Failed(f) => Some(*f),
            SearchResult::Found { .. } => None,
        }
    }
}

fn classify(outcome: LookupOutcome) -> Result<Vec<Entry>, SearchFailure> {
    match outcome {
        LookupOutcome::Found(entries) => Ok(entries),
        LookupOutcome::NotFound => Err(SearchFailure::NotFound),
        LookupOutcome::UpstreamError { .. } => Err(SearchFailure::UpstreamError),
        LookupOutcome::DecodeFailed { .. } => Err(SearchFailure::DecodeFailed),
        LookupOutcome::LookupFailed { .. } => Err(SearchFailure::LookupFailed),
    }
}

/// Data handed to the presentation layer.
///
/// Any field may be empty depending on which branch produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageData {
    pub results: Vec<Entry>,
    pub error: String,
    pub query: String,
    pub history: Vec<String>,
}

impl PageData {
    pub fn with_history(history: Vec<String>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }
}

impl From<SearchResult> for PageData {
    fn from(result: SearchResult) -> Self {
        match result {
            SearchResult::Found { query, entries } => PageData {
                results: entries,
                query,
                ..PageData::default()
            },
            SearchResult::Failed(failure) => PageData {
                error: failure.message().to_string(),
                ..PageData::default()
            },
        }
    }
}

/// Composes history recording and dictionary lookup for each request.
#[derive(Clone)]
pub struct SearchOrchestrator {
    history: Arc<HistoryStore>,
    lookup: Arc<dyn DictionaryLookup>,
}

impl SearchOrchestrator {
    pub fn new(history: Arc<HistoryStore>, lookup: Arc<dyn DictionaryLookup>) -> Self {
        Self { history, lookup }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Run one search for `client`.
    pub fn handle_search(&self, client: &ClientKey, raw_word: &str) -> SearchResult {
        let word = raw_word.trim();
        if word.is_empty() {
            info!("Empty search query rejected");
            return SearchResult::Failed(SearchFailure::EmptyQuery);
        }

        self.history.record(client, word);

        let outcome = self.lookup.lookup(word);
        let kind = outcome.kind();
        match classify(outcome) {
            Ok(entries) => {
                info!(word = %word, outcome = kind, entries = entries.len(), "Search completed");
                SearchResult::Found {
                    query: word.to_string(),
                    entries,
                }
            }
            Err(failure) => {
                warn!(word = %word, outcome = kind, "Search failed");
                SearchResult::Failed(failure)
            }
        }
    }

    /// Current history for `client`; never mutates.
    pub fn handle_history_view(&self, client: &ClientKey) -> Vec<String> {
        self.history.get(client)
    }
}
