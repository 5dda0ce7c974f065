use colored::*;
use eyre::{Context, Result};

use crate::cli::OutputFormat;
use crate::mbti::{MbtiCode, MbtiResult};

pub fn run(code: &str, format: OutputFormat) -> Result<()> {
    let code: MbtiCode = code.parse().context("Not an MBTI code")?;
    let result = MbtiResult::for_code(code);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&result)?),
        OutputFormat::Text => {
            println!("{} {}", "MBTI".bold(), result.code.to_string().cyan().bold());
            println!("  {:14} {}", "Population:".dimmed(), result.population_label());
            println!("  {:14} {}", "Exemplar:".dimmed(), result.exemplar_label());
        }
    }

    Ok(())
}
