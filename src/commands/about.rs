use colored::*;
use eyre::Result;

use crate::traits::TraitSet;

pub fn run() -> Result<()> {
    println!("{} {}", "persona".bold(), env!("CARGO_PKG_VERSION"));
    println!();
    println!("Analyzes a written or spoken self-description and estimates personality");
    println!("trait scores. Each analysis produces per-trait explanations, an MBTI code");
    println!("derived from the Big Five scores, suggested roles for the dominant trait,");
    println!("a PDF report with a radar chart, and a row in a CSV history file.");
    println!();

    println!("{}:", "Trait sets".cyan());
    for set in [TraitSet::BigFive, TraitSet::Archetype] {
        let names: Vec<&str> = set.traits().iter().map(|t| t.name()).collect();
        println!("  {:10} {}", set.name(), names.join(", "));
    }
    println!();

    println!("{}:", "Scores".cyan());
    println!("  Each trait is scored from 0 to 100. The dominant trait is the highest");
    println!("  score; ties go to the trait listed first. MBTI letters take the first");
    println!("  pole when its trait scores above 50.");
    println!();

    println!(
        "{} The default scorer returns fixed demonstration values. Configure",
        "Note:".yellow()
    );
    println!("  scorer.kind = classifier and scorer.model to score the text itself.");

    Ok(())
}
