use clap::Parser;
use lexiserve::cli::{run_cli, Cli};
use lexiserve::otel::{init_logging_with_config, LogConfig};
use lexiserve::runtime_config::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging_with_config(&LogConfig::from_env())?;
    RuntimeConfig::from_env().apply();
    run_cli(cli)
}
