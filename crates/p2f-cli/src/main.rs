//! p2f - Rename PDF documents after their contents.

use anyhow::Context;
use clap::Parser;
use p2f_cli::config::API_KEY_ENV;
use p2f_cli::{commands, Cli, Config, ConsolePrompter, Formatter, RunConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let config = Config::load_or_create(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let api_key = std::env::var(API_KEY_ENV).ok();
    let run_config = RunConfig::resolve(&config, &config_path, &cli, api_key)
        .context("Invalid configuration")?;

    let formatter = Formatter::new(run_config.format, run_config.color);
    let mut prompter = ConsolePrompter::new(run_config.format)?;

    commands::execute_rename(&cli.path, &run_config, &formatter, &mut prompter).await?;
    Ok(())
}
