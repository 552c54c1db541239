use crate::config::AppConfig;
use crate::dictionary::{DictionaryLookup, HttpDictionaryClient, LookupOutcome};
use crate::history::HistoryStore;
use crate::render::Renderer;
use crate::search::{SearchFailure, SearchOrchestrator};
use crate::server::{AppService, HttpServer};
use crate::session::AddrAgentResolver;
use crate::static_files::StaticFiles;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "lexiserve")]
#[command(about = "Dictionary lookup front-end with per-client search history", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Look up one word and print the result
    Lookup {
        word: String,

        #[arg(long, env = "LEXI_UPSTREAM")]
        upstream: Option<String>,

        #[arg(long, env = "LEXI_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    #[arg(short, long, env = "LEXI_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "LEXI_ADDR")]
    pub addr: Option<String>,

    #[arg(long, env = "LEXI_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    #[arg(long, env = "LEXI_UPSTREAM")]
    pub upstream: Option<String>,

    #[arg(long, env = "LEXI_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl ServeArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut cfg = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(addr) = &self.addr {
            cfg.server.addr = addr.clone();
        }
        if let Some(dir) = &self.static_dir {
            cfg.server.static_dir = dir.clone();
        }
        if let Some(upstream) = &self.upstream {
            cfg.upstream.base_url = upstream.clone();
        }
        if self.timeout_secs.is_some() {
            cfg.upstream.timeout_secs = self.timeout_secs;
        }
        Ok(cfg)
    }
}

/// Wire the history store, lookup client, identity resolver and renderer into a service.
pub fn build_service(cfg: &AppConfig) -> Result<AppService> {
    let client = HttpDictionaryClient::new(&cfg.upstream.base_url, cfg.upstream.timeout())?;
    let lookup: Arc<dyn DictionaryLookup> = Arc::new(client);
    let orchestrator = SearchOrchestrator::new(Arc::new(HistoryStore::new()), lookup);
    let renderer = Renderer::new().context("Failed to compile page templates")?;
    let static_files = if cfg.server.static_dir.is_dir() {
        Some(StaticFiles::new(cfg.server.static_dir.clone()))
    } else {
        warn!(
            static_dir = %cfg.server.static_dir.display(),
            "Static directory not found, /static/ disabled"
        );
        None
    };
    Ok(AppService::new(
        orchestrator,
        Arc::new(AddrAgentResolver),
        Arc::new(renderer),
        static_files,
    ))
}

fn serve(args: &ServeArgs) -> Result<()> {
    let cfg = args.resolve_config()?;
    let service = build_service(&cfg)?;
    let handle = HttpServer(service)
        .start(cfg.server.addr.as_str())
        .with_context(|| format!("Failed to bind {}", cfg.server.addr))?;
    info!(
        addr = %handle.addr(),
        upstream = %cfg.upstream.base_url,
        timeout_secs = ?cfg.upstream.timeout_secs,
        "Server started"
    );
    handle
        .join()
        .map_err(|e| anyhow!("Server coroutine panicked: {e:?}"))
}

fn lookup(word: &str, upstream: Option<&str>, timeout_secs: Option<u64>) -> Result<()> {
    let word = word.trim();
    if word.is_empty() {
        bail!("{}", SearchFailure::EmptyQuery);
    }
    let mut cfg = AppConfig::default();
    if let Some(u) = upstream {
        cfg.upstream.base_url = u.to_string();
    }
    cfg.upstream.timeout_secs = timeout_secs;
    let client = HttpDictionaryClient::new(&cfg.upstream.base_url, cfg.upstream.timeout())?;
    match client.lookup(word) {
        LookupOutcome::Found(entries) => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(())
        }
        LookupOutcome::NotFound => bail!("{}", SearchFailure::NotFound),
        LookupOutcome::UpstreamError { .. } => bail!("{}", SearchFailure::UpstreamError),
        LookupOutcome::LookupFailed { .. } => bail!("{}", SearchFailure::LookupFailed),
        LookupOutcome::DecodeFailed { .. } => bail!("{}", SearchFailure::DecodeFailed),
    }
}

pub fn run_cli(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Serve(args) => serve(args),
        Commands::Lookup {
            word,
            upstream,
            timeout_secs,
        } => lookup(word, upstream.as_deref(), *timeout_secs),
    }
}
