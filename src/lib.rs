//! # lexiserve
//!
//! **lexiserve** is a small coroutine-powered HTTP front-end for an online
//! dictionary. A client submits a word, the server looks it up in the upstream
//! lexical database, classifies the response and renders pronunciations, parts
//! of speech, definitions, examples, synonyms and antonyms. Each client also
//! gets a short list of the words it searched for recently.
//!
//! ## Architecture
//!
//! - **[`session`]** - Derives a [`ClientKey`](session::ClientKey) from connection attributes
//! - **[`history`]** - Bounded, case-insensitively deduplicated per-client history
//! - **[`dictionary`]** - Upstream data model and the [`DictionaryLookup`](dictionary::DictionaryLookup) client
//! - **[`search`]** - The search pipeline tying the three together
//! - **[`render`]** - HTML pages rendered from [`PageData`](search::PageData)
//! - **[`server`]** - HTTP service built on `may_minihttp`
//! - **[`static_files`]** - `/static/*` asset passthrough
//! - **[`config`]**, **[`runtime_config`]**, **[`otel`]**, **[`cli`]** - Startup plumbing
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as AppService<br/>(may_minihttp)
//!     participant Resolver as IdentityResolver
//!     participant Search as SearchOrchestrator
//!     participant History as HistoryStore
//!     participant Lookup as DictionaryLookup
//!     participant Upstream as dictionaryapi.dev
//!
//!     Client->>Server: POST /search (word=" Hello ")
//!     Server->>Resolver: resolve(addr, user-agent)
//!     Resolver-->>Server: ClientKey
//!     Server->>Search: handle_search(key, " Hello ")
//!     Search->>Search: trim → "Hello"
//!     alt empty after trim
//!         Search-->>Server: EmptyQuery
//!     end
//!     Search->>History: record(key, "Hello")
//!     Search->>Lookup: lookup("Hello")
//!     Lookup->>Upstream: GET /api/v2/entries/en/Hello
//!     Upstream-->>Lookup: 200 [Entry...] / 404 / 5xx / bad JSON
//!     Lookup-->>Search: LookupOutcome
//!     Search-->>Server: SearchResult
//!     Server-->>Client: 200 text/html (results or message)
//! ```
//!
//! ## Runtime Considerations
//!
//! Each request runs in a `may` coroutine. The upstream call uses
//! `reqwest::blocking` and holds its coroutine until the upstream answers;
//! there is no cancellation when the client goes away. Set a timeout with
//! `--timeout-secs` or `upstream.timeout_secs` to bound it.
//!
//! ## Quick Start
//!
//! ```bash
//! lexiserve serve --config config/config.yaml
//! curl -d word=serendipity http://localhost:8080/search
//! ```

pub mod cli;
pub mod config;
pub mod dictionary;
pub mod history;
pub mod ids;
pub mod otel;
pub mod render;
pub mod runtime_config;
pub mod search;
pub mod server;
pub mod session;
pub mod static_files;

pub use dictionary::{DictionaryLookup, Entry, HttpDictionaryClient, LookupOutcome};
pub use history::{HistoryStore, HISTORY_CAPACITY};
pub use search::{PageData, SearchFailure, SearchOrchestrator, SearchResult};
pub use session::{AddrAgentResolver, ClientKey, ConnectionAttributes, IdentityResolver};
