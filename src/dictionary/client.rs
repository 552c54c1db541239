use super::types::Entry;
use anyhow::{Context, Result};
use may::sync::mpsc;
use std::fmt::{Display, Formatter};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn, Span};

/// Public endpoint of the Free Dictionary API (English).
pub const DEFAULT_UPSTREAM_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// Classified result of a single upstream lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Success status and a decodable array of entries
    Found(Vec<Entry>),
    /// Upstream answered 404
    NotFound,
    /// Upstream answered with another non-success status
    UpstreamError { status: u16 },
    /// Success status but the body was not a JSON array of entries
    DecodeFailed { reason: String },
    /// The request never produced a response (DNS, connect, TLS, timeout)
    LookupFailed { reason: String },
}

impl LookupOutcome {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupOutcome::Found(_) => "found",
            LookupOutcome::NotFound => "not_found",
            LookupOutcome::UpstreamError { .. } => "upstream_error",
            LookupOutcome::DecodeFailed { .. } => "decode_failed",
            LookupOutcome::LookupFailed { .. } => "lookup_failed",
        }
    }
}

impl Display for LookupOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupOutcome::Found(entries) => write!(f, "found {} entries", entries.len()),
            LookupOutcome::NotFound => write!(f, "not found"),
            LookupOutcome::UpstreamError { status } => write!(f, "upstream status {status}"),
            LookupOutcome::DecodeFailed { reason } => write!(f, "decode failed: {reason}"),
            LookupOutcome::LookupFailed { reason } => write!(f, "lookup failed: {reason}"),
        }
    }
}

/// Capability for looking up one word.
///
/// The search orchestrator only sees this trait, so timeouts, retries or a
/// test double can be swapped in without touching request handling.
pub trait DictionaryLookup: Send + Sync {
    /// `word` is non-empty and already trimmed.
    fn lookup(&self, word: &str) -> LookupOutcome;
}

/// Lookup client backed by `reqwest::blocking`.
///
/// The call parks the calling coroutine until the upstream answers or the
/// connection fails; the blocking I/O itself happens off the scheduler's
/// worker threads. There is no retry and no caching. Without an explicit
/// timeout the reqwest default applies.
///
/// # Usage
///
/// ```no_run
/// use lexiserve::dictionary::{DictionaryLookup, HttpDictionaryClient, DEFAULT_UPSTREAM_BASE};
/// use std::time::Duration;
///
/// let client = HttpDictionaryClient::new(DEFAULT_UPSTREAM_BASE, Some(Duration::from_secs(5)))
///     .expect("client");
/// println!("{}", client.lookup("serendipity"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpDictionaryClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpDictionaryClient {
    /// Create a client for `base_url` (the endpoint template minus the word segment).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client (TLS backend) cannot be initialized.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .context("Failed to build dictionary HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Full request URL for `word`, with the word percent-encoded as one path segment.
    pub fn endpoint_for(&self, word: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(word))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform the request and classify the response on the calling thread.
    fn fetch(client: &reqwest::blocking::Client, url: &str, word: &str) -> LookupOutcome {
        let start = Instant::now();
        debug!(url = %url, "Dictionary lookup started");

        let response = match client.get(url).send() {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %url, error = %e, "Dictionary request failed");
                return LookupOutcome::LookupFailed {
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if status == reqwest::StatusCode::NOT_FOUND {
            info!(word = %word, status = status.as_u16(), elapsed_ms, "Word not found upstream");
            return LookupOutcome::NotFound;
        }
        if !status.is_success() {
            warn!(word = %word, status = status.as_u16(), elapsed_ms, "Upstream returned error status");
            return LookupOutcome::UpstreamError {
                status: status.as_u16(),
            };
        }

        // A bare `null` body decodes as no entries.
        match response.json::<Option<Vec<Entry>>>().map(Option::unwrap_or_default) {
            Ok(entries) => {
                info!(
                    word = %word,
                    entries = entries.len(),
                    elapsed_ms,
                    "Dictionary lookup succeeded"
                );
                LookupOutcome::Found(entries)
            }
            Err(e) => {
                warn!(word = %word, error = %e, "Dictionary response decode failed");
                LookupOutcome::DecodeFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl DictionaryLookup for HttpDictionaryClient {
    /// Runs the blocking request on a dedicated OS thread and waits on a `may`
    /// channel, so only the calling coroutine parks while the upstream answers.
    /// The scheduler's worker threads stay free for other requests.
    fn lookup(&self, word: &str) -> LookupOutcome {
        let url = self.endpoint_for(word);
        let client = self.client.clone();
        let owned_word = word.to_string();
        let span = Span::current();
        let (reply_tx, reply_rx) = mpsc::channel::<LookupOutcome>();

        let spawned = thread::Builder::new()
            .name("dictionary-lookup".to_string())
            .spawn(move || {
                let outcome = span.in_scope(|| Self::fetch(&client, &url, &owned_word));
                // The receiver only goes away if the waiting coroutine was cancelled.
                if reply_tx.send(outcome).is_err() {
                    debug!(word = %owned_word, "Lookup result dropped; requester gone");
                }
            });
        if let Err(e) = spawned {
            error!(error = %e, "Failed to spawn dictionary lookup thread");
            return LookupOutcome::LookupFailed {
                reason: e.to_string(),
            };
        }

        reply_rx.recv().unwrap_or_else(|_| {
            error!(word = %word, "Dictionary lookup thread exited without a result");
            LookupOutcome::LookupFailed {
                reason: "lookup thread exited without a result".to_string(),
            }
        })
    }
}
