use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::profile::TraitProfile;
use crate::traits::{Trait, TraitSet};

#[derive(Serialize)]
struct TraitInfo {
    name: Trait,
    #[serde(flatten)]
    profile: TraitProfile,
}

pub fn run(set: TraitSet, format: OutputFormat) -> Result<()> {
    let traits: Vec<TraitInfo> = set
        .traits()
        .iter()
        .map(|&t| TraitInfo {
            name: t,
            profile: TraitProfile::of(t),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&traits)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&traits)?),
        OutputFormat::Text => {
            println!("{} {}", "Trait set:".bold(), set.name().cyan());
            println!();
            for info in &traits {
                println!("  {}", info.name.name().bold());
                println!("    {}", info.profile.description);
                println!("    {} {}", "Tip:".dimmed(), info.profile.tip);
            }
        }
    }

    Ok(())
}
