use colored::*;
use eyre::{Context, Result};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::explain::format_score;
use crate::history::{DATE_FORMAT, HistoryRecord, HistoryStore};
use crate::traits::TraitSet;

pub fn run(limit: Option<usize>, set: TraitSet, format: OutputFormat, config: &Config) -> Result<()> {
    let precision = config.report.score_precision;
    let store = HistoryStore::new(config.history_path_for(set), set).with_precision(precision);

    let records = match limit {
        Some(n) => store.load_limited(n),
        None => store.load(),
    }
    .context(format!("Failed to read history from {}", store.path().display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&records)?),
        OutputFormat::Text => {
            println!("{} Analysis history ({}):", "📋".blue(), store.path().display());
            println!();

            if records.is_empty() {
                println!("  {}", "(no history yet)".dimmed());
            } else {
                for record in &records {
                    print_record(record, precision);
                }
            }
        }
    }

    Ok(())
}

fn print_record(record: &HistoryRecord, precision: usize) {
    let date = record.date.format(DATE_FORMAT).to_string();
    println!(
        "  {} {} {}",
        date.dimmed(),
        record.name.bold(),
        record.top_trait.name().cyan()
    );
    let scores: Vec<String> = record
        .scores
        .iter()
        .map(|(t, s)| format!("{} {}", t.name(), format_score(s, precision)))
        .collect();
    println!("    {}", scores.join(", ").dimmed());
}
