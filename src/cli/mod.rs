//! # CLI Module
//!
//! Command-line interface for the `lexiserve` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Start the HTTP front-end:
//!
//! ```bash
//! lexiserve serve --config config/config.yaml --addr 127.0.0.1:8080
//! ```
//!
//! Options (each overrides the config file):
//! - `--config <FILE>` - YAML configuration file
//! - `--addr <ADDR>` - Listen address (`LEXI_ADDR`)
//! - `--static-dir <DIR>` - Directory served under `/static/` (`LEXI_STATIC_DIR`)
//! - `--upstream <URL>` - Dictionary endpoint without the word segment (`LEXI_UPSTREAM`)
//! - `--timeout-secs <N>` - Upstream request timeout (`LEXI_TIMEOUT_SECS`)
//!
//! ### `lookup`
//!
//! One-shot lookup against the upstream, printing entries as JSON:
//!
//! ```bash
//! lexiserve lookup serendipity
//! ```

mod commands;


pub use commands::{build_service, run_cli, Cli, Commands, ServeArgs};
