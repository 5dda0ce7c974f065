use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::explain::Language;
use crate::traits::TraitSet;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "persona",
    about = "Personality trait analysis from free text, with PDF reports and a CSV history",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/persona/logs/persona.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to persona.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a description and produce a report
    Analyze(AnalyzeArgs),

    /// Show past analyses, newest first
    History {
        /// Show at most this many records
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Trait set whose history to show (defaults to scorer.traits from config)
        #[arg(long, value_enum)]
        traits: Option<TraitSet>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Look up an MBTI code
    Mbti {
        /// Four-letter code, e.g. ENFJ
        code: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the traits of a trait set
    Traits {
        /// Trait set (defaults to scorer.traits from config)
        #[arg(long, value_enum)]
        traits: Option<TraitSet>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// What this tool does and what its scores mean
    About,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Name shown on the report and stored in history
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub input: InputArgs,

    /// Trait set to score (defaults to scorer.traits from config)
    #[arg(long, value_enum)]
    pub traits: Option<TraitSet>,

    /// Explanation language (defaults to report.language from config)
    #[arg(long, value_enum)]
    pub language: Option<Language>,

    /// Also write the radar chart as SVG to this path
    #[arg(long)]
    pub chart_svg: Option<PathBuf>,

    /// PNG chart image to embed in the report
    #[arg(long)]
    pub chart_image: Option<PathBuf>,

    /// Skip writing the PDF report
    #[arg(long)]
    pub no_report: bool,

    /// Skip appending to the history file
    #[arg(long)]
    pub no_history: bool,

    /// Output format (default: text for TTY, json for pipes)
    #[arg(long, short = 'o', value_enum)]
    pub format: Option<OutputFormat>,
}

/// Where the description comes from; exactly one is required
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Description text
    #[arg(long)]
    pub text: Option<String>,

    /// Read the description from a file ("-" for stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Record the description with the configured speech command
    #[arg(long)]
    pub speak: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key, e.g. report.language
        key: String,
    },
}
