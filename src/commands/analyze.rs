use chrono::Local;
use colored::*;
use eyre::{Context, Result, eyre};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use crate::analysis::{Analysis, AnalysisError, AnalysisRequest, Analyzer};
use crate::chart::RadarChart;
use crate::cli::{AnalyzeArgs, InputArgs, OutputFormat};
use crate::config::{Config, ScorerKind};
use crate::explain::format_score;
use crate::history::HistoryStore;
use crate::report::ReportRenderer;
use crate::scorer::{ClassifierScorer, FixedScorer, TraitScorer};
use crate::speech::{CommandTranscriber, Transcriber};
use crate::traits::TraitSet;

const SVG_SIZE: u32 = 480;

pub fn run(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let set = args.traits.unwrap_or(config.scorer.traits);
    let language = args.language.unwrap_or(config.report.language);
    let precision = config.report.score_precision;
    let format = OutputFormat::resolve(args.format);

    let text = read_input(&args.input, config)?;

    let scorer = build_scorer(config, set)?;
    let mut analyzer = Analyzer::new(scorer, precision).context("Lookup tables do not cover the trait set")?;
    if !args.no_report {
        analyzer = analyzer.with_report(
            ReportRenderer::new(config.reports_dir())
                .with_title(&config.report.title)
                .with_footer(config.report.footer.clone())
                .with_precision(precision)
                .with_qr_payload(config.report.qr_payload.clone())
                .with_chart(config.report.embed_chart),
        );
    }
    if !args.no_history {
        let store = HistoryStore::new(config.history_path_for(set), set).with_precision(precision);
        analyzer = analyzer.with_history(store);
    }

    let request = AnalysisRequest {
        name: &args.name,
        text: &text,
        language,
        chart_image: args.chart_image.as_deref(),
        created_at: Local::now(),
    };

    let analysis = match analyzer.run(&request) {
        Ok(analysis) => analysis,
        Err(AnalysisError::Validation(e)) => {
            eprintln!("{} {}", "⚠".yellow(), e);
            return Err(e.into());
        }
        Err(e) => return Err(e).context("Analysis failed"),
    };

    if let Some(path) = &args.chart_svg {
        write_svg(path, &analysis)?;
    }

    if analysis.demonstration {
        eprintln!(
            "{} Scores come from the fixed demonstration scorer and do not reflect the text",
            "⚠".yellow()
        );
    }
    if let Some(reason) = &analysis.degraded {
        eprintln!("{} Scoring failed, showing uniform scores: {}", "⚠".yellow(), reason);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&analysis)?),
        OutputFormat::Text => print_text(&analysis, precision),
    }

    Ok(())
}

fn build_scorer(config: &Config, set: TraitSet) -> Result<Box<dyn TraitScorer>> {
    match config.scorer.kind {
        ScorerKind::Fixed => Ok(Box::new(FixedScorer::new(set))),
        ScorerKind::Classifier => {
            let model = config
                .scorer
                .model
                .as_ref()
                .ok_or_else(|| eyre!("scorer.kind is classifier but scorer.model is not set"))?;
            let path = Config::expand_path(model);
            let scorer = ClassifierScorer::load(&path, set)
                .context(format!("Failed to load classifier model from {}", path.display()))?;
            Ok(Box::new(scorer))
        }
    }
}

fn read_input(input: &InputArgs, config: &Config) -> Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }

    if let Some(path) = &input.file {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read description from stdin")?;
            return Ok(buf);
        }
        return fs::read_to_string(path).context(format!("Failed to read description from {}", path.display()));
    }

    // --speak; a failed transcription falls through to validation as blank text
    let transcriber = CommandTranscriber::new(
        config.speech.command.clone(),
        Duration::from_secs(config.speech.timeout_secs),
    );
    let transcript = transcriber.transcribe();
    match &transcript.failure {
        Some(failure) => eprintln!("{} {}", "⚠".yellow(), failure),
        None => eprintln!("{} You said: {}", "🎙".blue(), transcript.text),
    }
    Ok(transcript.text)
}

fn write_svg(path: &Path, analysis: &Analysis) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
    }
    let svg = RadarChart::new(&analysis.scores).to_svg(SVG_SIZE);
    fs::write(path, svg).context(format!("Failed to write chart to {}", path.display()))?;
    log::info!("Wrote radar chart to {}", path.display());
    Ok(())
}

fn print_text(analysis: &Analysis, precision: usize) {
    println!("{} {}", "Personality analysis for".bold(), analysis.name.bold().cyan());
    println!();

    println!("{}:", "Scores".cyan());
    for (t, score) in analysis.scores.iter() {
        let marker = if t == analysis.dominant { "●".green() } else { "○".dimmed() };
        println!("  {} {:18} {:>8}", marker, t.name(), format_score(score, precision));
    }
    println!();

    println!(
        "{} {} ({})",
        "Top trait:".cyan(),
        analysis.dominant.name().bold(),
        format_score(analysis.dominant_score, precision)
    );
    println!("  {}", analysis.profile.description);
    println!("  {} {}", "Tip:".dimmed(), analysis.profile.tip);
    println!("  {}", format!("\"{}\"", analysis.profile.quote).italic());
    println!();

    println!("{}:", "Suggested roles".cyan());
    for role in &analysis.roles {
        println!("  - {}", role);
    }
    println!();

    if let Some(mbti) = &analysis.mbti {
        println!("{} {}", "MBTI:".cyan(), mbti.code.to_string().bold());
        println!("  {:14} {}", "Population:".dimmed(), mbti.population_label());
        println!("  {:14} {}", "Exemplar:".dimmed(), mbti.exemplar_label());
        println!();
    }

    println!("{}:", "Explanations".cyan());
    for line in &analysis.explanations {
        println!("  {}", line);
    }

    if analysis.report.is_some() || analysis.history.is_some() {
        println!();
    }
    if let Some(report) = &analysis.report {
        println!(
            "{} Report saved to {} ({} page{})",
            "✓".green(),
            report.path.display(),
            report.pages,
            if report.pages == 1 { "" } else { "s" }
        );
    }
    if let Some(history) = &analysis.history {
        println!("{} History updated at {}", "✓".green(), history.display());
    }
}
