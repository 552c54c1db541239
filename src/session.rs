//! # Session Identity
//!
//! Derives a [`ClientKey`] for each incoming request from connection-level
//! attributes. The key scopes the search history kept by
//! [`HistoryStore`](crate::history::HistoryStore).
//!
//! The default [`AddrAgentResolver`] concatenates the remote address with the
//! client-declared `User-Agent`. Two different people behind the same NAT with
//! the same browser share a key; nothing here tries to prevent that. A cookie
//! or session-token based resolver can replace it through the
//! [`IdentityResolver`] trait without touching the history store or the
//! search orchestrator.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Opaque per-client identity token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientKey(String);

impl ClientKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short hash of the key for log lines; the raw key carries an IP address.
    pub fn fingerprint(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

impl Display for ClientKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transport-level attributes available when a request arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionAttributes {
    /// Remote network address as reported by the transport or a fronting proxy
    pub remote_addr: String,
    /// Client-declared agent string (`User-Agent` header)
    pub user_agent: String,
}

impl ConnectionAttributes {
    pub fn new(remote_addr: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Extract attributes from lowercase request headers.
    ///
    /// `may_minihttp` does not hand the peer socket address to services, so the
    /// address comes from `X-Forwarded-For` (first hop) or `X-Real-IP`. Both
    /// missing yields an empty address.
    pub fn from_headers(headers: &HashMap<String, String>) -> Self {
        let remote_addr = headers
            .get("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| headers.get("x-real-ip").map(|v| v.trim().to_string()))
            .unwrap_or_default();
        let user_agent = headers.get("user-agent").cloned().unwrap_or_default();
        Self {
            remote_addr,
            user_agent,
        }
    }
}

/// Capability that maps connection attributes to a client identity.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, attrs: &ConnectionAttributes) -> ClientKey;
}

/// Address + agent concatenation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddrAgentResolver;

impl IdentityResolver for AddrAgentResolver {
    fn resolve(&self, attrs: &ConnectionAttributes) -> ClientKey {
        let mut key = String::with_capacity(attrs.remote_addr.len() + attrs.user_agent.len());
        key.push_str(&attrs.remote_addr);
        key.push_str(&attrs.user_agent);
        ClientKey(key)
    }
}
