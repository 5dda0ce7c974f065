use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Persona Configuration".bold());
            println!();

            println!("{}:", "paths".cyan());
            println!("  reports: {}", config.reports_dir().display());
            println!("  history: {}", config.history_path().display());
            println!();

            println!("{}:", "scorer".cyan());
            for key in ["scorer.kind", "scorer.model", "scorer.traits"] {
                print_key(key, config);
            }
            println!();

            println!("{}:", "report".cyan());
            for key in [
                "report.language",
                "report.score_precision",
                "report.title",
                "report.footer",
                "report.qr_payload",
                "report.embed_chart",
            ] {
                print_key(key, config);
            }
            println!();

            println!("{}:", "speech".cyan());
            print_key("speech.command", config);
            print_key("speech.timeout_secs", config);
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
        }
    }

    Ok(())
}

fn print_key(key: &str, config: &Config) {
    let short = key.split_once('.').map(|(_, k)| k).unwrap_or(key);
    let value = config.get(key).unwrap_or_default();
    if value.is_empty() {
        println!("  {}: {}", short, "(unset)".dimmed());
    } else {
        println!("  {}: {}", short, value);
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    match config.get(key) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}
