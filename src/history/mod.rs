//! # History Store
//!
//! Process-wide record of the words each client has searched for, newest first.
//!
//! ## Rules
//!
//! - At most [`HISTORY_CAPACITY`] words per client; the oldest fall off the tail.
//! - Words are distinct ignoring case. Searching `"CAT"` after `"cat"` changes nothing.
//! - A word keeps the position of its first search. Re-searching does not move it
//!   to the front.
//!
//! Lists are created on the first recorded word for a client and live for the
//! lifetime of the process. Nothing is persisted.
//!
//! ## Concurrency
//!
//! Lists live in a [`DashMap`]. `record` mutates through the entry guard, which
//! holds the shard write lock for the whole scan-prepend-truncate sequence, so
//! two coroutines recording for the same client are serialized and a reader
//! only ever sees a list before or after a complete update.

use crate::session::ClientKey;
use dashmap::DashMap;
use tracing::debug;

/// Maximum number of words kept per client.
pub const HISTORY_CAPACITY: usize = 10;

/// Shared per-client search history.
#[derive(Debug, Default)]
pub struct HistoryStore {
    lists: DashMap<ClientKey, Vec<String>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a search for `key`.
    ///
    /// `word` must already be trimmed and non-empty. Returns `true` when the
    /// word was added, `false` when a case-insensitive match was already present.
    pub fn record(&self, key: &ClientKey, word: &str) -> bool {
        let mut list = self.lists.entry(key.clone()).or_default();
        if list.iter().any(|existing| eq_fold(existing, word)) {
            debug!(word = %word, len = list.len(), "History word already present");
            return false;
        }
        list.insert(0, word.to_string());
        list.truncate(HISTORY_CAPACITY);
        debug!(word = %word, len = list.len(), "History word recorded");
        true
    }

    /// Snapshot of the client's history, newest first. Empty if nothing was recorded.
    pub fn get(&self, key: &ClientKey) -> Vec<String> {
        self.lists
            .get(key)
            .map(|list| list.value().clone())
            .unwrap_or_default()
    }

    /// Number of clients with at least one recorded word.
    pub fn client_count(&self) -> usize {
        self.lists.len()
    }
}

/// Case-insensitive comparison under Unicode simple case folding.
///
/// Characters are compared one to one, so `"ß"` and `"SS"` differ, while
/// `"ς"`, `"σ"` and `"Σ"` all match.
fn eq_fold(a: &str, b: &str) -> bool {
    a.chars().map(simple_fold).eq(b.chars().map(simple_fold))
}

/// Canonical member of `c`'s case orbit. Mappings that expand to several
/// characters are not simple folds and leave the character as is.
fn simple_fold(c: char) -> char {
    // Dotless i only folds under Turkic rules.
    if c == '\u{131}' {
        return c;
    }
    let upper = single_char(c.to_uppercase()).unwrap_or(c);
    single_char(upper.to_lowercase()).unwrap_or(upper)
}

fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    match chars.next() {
        None => Some(first),
        Some(_) => None,
    }
}
