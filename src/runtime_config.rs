//! # Runtime Configuration Module
//!
//! Environment-driven settings for the coroutine runtime.
//!
//! ## Environment Variables
//!
//! ### `LEXI_STACK_SIZE`
//!
//! Stack size for request coroutines. Accepts decimal (`16384`) or
//! hexadecimal (`0x40000`). Default: `0x40000` (256 KB).
//!
//! Each request runs in its own `may` coroutine, and within it the blocking
//! `reqwest` call, JSON decoding and template rendering all share that stack.
//! 16 KB is not enough for template rendering; lower the default only with care.
//!
//! ## Usage
//!
//! ```rust
//! use lexiserve::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;

pub const DEFAULT_STACK_SIZE: usize = 0x40000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let stack_size = env::var("LEXI_STACK_SIZE")
            .ok()
            .and_then(|val| parse_stack_size(&val))
            .unwrap_or(DEFAULT_STACK_SIZE);
        RuntimeConfig { stack_size }
    }

    /// Apply to the global `may` scheduler. Call before the server starts.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

fn parse_stack_size(val: &str) -> Option<usize> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stack_size() {
        assert_eq!(parse_stack_size("0x8000"), Some(0x8000));
        assert_eq!(parse_stack_size("0X10"), Some(16));
        assert_eq!(parse_stack_size("32768"), Some(32768));
        assert_eq!(parse_stack_size("lots"), None);
    }
}
