//! # Dictionary Module
//!
//! Lexical data model and the client that fetches it from the upstream
//! dictionary service.
//!
//! - [`types`] holds the serde models (`Entry`, `Phonetic`, `Meaning`, `Definition`)
//! - [`client`] holds the [`DictionaryLookup`] capability and its HTTP implementation
//!
//! Every upstream response is folded into a [`LookupOutcome`]; nothing in this
//! module returns an error to the request path.

pub mod client;
pub mod types;

pub use client::{DictionaryLookup, HttpDictionaryClient, LookupOutcome, DEFAULT_UPSTREAM_BASE};
pub use types::{Definition, Entry, Meaning, Phonetic};
