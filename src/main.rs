use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod analysis;
mod chart;
mod cli;
mod commands;
mod config;
mod error;
mod explain;
mod history;
mod mbti;
mod profile;
mod report;
mod roles;
mod sanitize;
mod scorer;
mod speech;
mod traits;

use cli::{Cli, Commands, OutputFormat};
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("persona")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("persona.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args, &config),
        Commands::History { limit, traits, format } => commands::history::run(
            limit,
            traits.unwrap_or(config.scorer.traits),
            OutputFormat::resolve(format),
            &config,
        ),
        Commands::Mbti { code, format } => commands::mbti::run(&code, OutputFormat::resolve(format)),
        Commands::Traits { traits, format } => {
            commands::traits::run(traits.unwrap_or(config.scorer.traits), OutputFormat::resolve(format))
        }
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::About => commands::about::run(),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config.log_level).context("Failed to setup logging")?;

    info!("Starting persona with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
