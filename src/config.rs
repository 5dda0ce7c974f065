use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::explain::Language;
use crate::traits::TraitSet;

/// Main persona configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub scorer: ScorerConfig,
    pub report: ReportConfig,
    pub speech: SpeechConfig,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory PDF reports are written to
    pub reports: PathBuf,
    /// CSV file analyses are appended to
    pub history: PathBuf,
}

/// Which scorer backs the analysis
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// Fixed demonstration values, not a prediction
    #[default]
    Fixed,
    /// Linear text classifier loaded from `scorer.model`
    Classifier,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub kind: ScorerKind,
    pub model: Option<PathBuf>,
    pub traits: TraitSet,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub language: Language,
    pub score_precision: usize,
    pub title: String,
    pub footer: Option<String>,
    /// Encoded as a QR code at the end of the report
    pub qr_payload: Option<String>,
    /// Draw the radar chart into the report
    pub embed_chart: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Program and arguments; must print the transcript on stdout
    pub command: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let persona_dir = Config::persona_dir();

        Self {
            reports: persona_dir.join("reports"),
            history: persona_dir.join("personality_history.csv"),
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            kind: ScorerKind::Fixed,
            model: None,
            traits: TraitSet::BigFive,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            language: Language::English,
            score_precision: 2,
            title: "Personality Mix Analyzer Report".to_string(),
            footer: None,
            qr_payload: None,
            embed_chart: true,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // PERSONA_CONFIG names a file that must parse if it exists
        if let Ok(env_path) = std::env::var("PERSONA_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                return Self::load_from_file(&path)
                    .context(format!("Failed to load config from PERSONA_CONFIG={}", path.display()));
            }
            log::warn!("PERSONA_CONFIG points at missing file {}", path.display());
        }

        // Try PERSONA_DIR/persona.yaml
        if let Ok(persona_dir) = std::env::var("PERSONA_DIR") {
            let path = PathBuf::from(persona_dir).join("persona.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from PERSONA_DIR: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/persona/persona.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("persona").join("persona.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./persona.yaml (for development)
        let local_config = PathBuf::from("persona.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Get the persona directory (where reports and history live by default)
    pub fn persona_dir() -> PathBuf {
        std::env::var("PERSONA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("persona"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    pub fn reports_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.reports)
    }

    pub fn history_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.history)
    }

    /// History file for `set`: the configured file for `scorer.traits`,
    /// a `<stem>_<set>` sibling for any other set
    pub fn history_path_for(&self, set: TraitSet) -> PathBuf {
        let path = self.history_path();
        if set == self.scorer.traits {
            return path;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "history".to_string());
        let file_name = match path.extension() {
            Some(ext) => format!("{}_{}.{}", stem, set.name(), ext.to_string_lossy()),
            None => format!("{}_{}", stem, set.name()),
        };
        path.with_file_name(file_name)
    }

    /// Look up a dotted key for `persona config get`
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "paths.reports" => self.paths.reports.display().to_string(),
            "paths.history" => self.paths.history.display().to_string(),
            "scorer.kind" => format!("{:?}", self.scorer.kind).to_lowercase(),
            "scorer.model" => self
                .scorer
                .model
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "scorer.traits" => self.scorer.traits.to_string(),
            "report.language" => self.report.language.to_string(),
            "report.score_precision" => self.report.score_precision.to_string(),
            "report.title" => self.report.title.clone(),
            "report.footer" => self.report.footer.clone().unwrap_or_default(),
            "report.qr_payload" => self.report.qr_payload.clone().unwrap_or_default(),
            "report.embed_chart" => self.report.embed_chart.to_string(),
            "speech.command" => self.speech.command.join(" "),
            "speech.timeout_secs" => self.speech.timeout_secs.to_string(),
            "log_level" | "log-level" => self.log_level.as_filter().to_string(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scorer.kind, ScorerKind::Fixed);
        assert_eq!(config.scorer.traits, TraitSet::BigFive);
        assert_eq!(config.report.language, Language::English);
        assert_eq!(config.report.score_precision, 2);
        assert!(config.report.embed_chart);
        assert_eq!(config.speech.timeout_secs, 30);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_default_history_file_name() {
        let paths = PathsConfig::default();
        assert!(paths.history.ends_with("personality_history.csv"));
        assert!(paths.reports.ends_with("reports"));
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/usr/local/bin");
        let expanded = Config::expand_path(&path);
        assert_eq!(expanded, PathBuf::from("/usr/local/bin"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test");
        let expanded = Config::expand_path(&path);
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().contains("test"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        // SAFETY: Test runs single-threaded, env var is test-specific
        unsafe {
            std::env::set_var("PERSONA_TEST_VAR", "/custom/path");
        }
        let path = PathBuf::from("$PERSONA_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);
        assert_eq!(expanded, PathBuf::from("/custom/path/subdir"));
        unsafe {
            std::env::remove_var("PERSONA_TEST_VAR");
        }
    }

    #[test]
    fn test_persona_dir_not_empty() {
        let dir = Config::persona_dir();
        assert!(!dir.to_string_lossy().is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "scorer:\n  traits: archetype\nreport:\n  language: spanish\n  score_precision: 1\nlog_level: debug\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.scorer.traits, TraitSet::Archetype);
        assert_eq!(config.scorer.kind, ScorerKind::Fixed);
        assert_eq!(config.report.language, Language::Spanish);
        assert_eq!(config.report.score_precision, 1);
        assert_eq!(config.report.title, "Personality Mix Analyzer Report");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("persona.yaml");
        fs::write(&path, "paths:\n  reports: /tmp/r\n  history: /tmp/h.csv\nspeech:\n  command: [whisper-cli, --stdout]\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.paths.reports, PathBuf::from("/tmp/r"));
        assert_eq!(config.speech.command, vec!["whisper-cli", "--stdout"]);
    }

    #[test]
    fn test_load_explicit_file_bad_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("persona.yaml");
        fs::write(&path, "scorer:\n  kind: oracle\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_get_keys() {
        let config = Config::default();
        assert_eq!(config.get("scorer.kind").as_deref(), Some("fixed"));
        assert_eq!(config.get("scorer.traits").as_deref(), Some("big-five"));
        assert_eq!(config.get("report.score_precision").as_deref(), Some("2"));
        assert_eq!(config.get("log_level").as_deref(), Some("INFO"));
        assert_eq!(config.get("no.such.key"), None);
    }

    #[test]
    fn test_history_path_per_trait_set() {
        let mut config = Config::default();
        config.paths.history = PathBuf::from("/data/personality_history.csv");

        assert_eq!(
            config.history_path_for(TraitSet::BigFive),
            PathBuf::from("/data/personality_history.csv")
        );
        assert_eq!(
            config.history_path_for(TraitSet::Archetype),
            PathBuf::from("/data/personality_history_archetype.csv")
        );

        config.scorer.traits = TraitSet::Archetype;
        assert_eq!(
            config.history_path_for(TraitSet::Archetype),
            PathBuf::from("/data/personality_history.csv")
        );
        assert_eq!(
            config.history_path_for(TraitSet::BigFive),
            PathBuf::from("/data/personality_history_big-five.csv")
        );
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let yaml_str = serde_yaml::to_string(&config).expect("Failed to serialize");
        let parsed: Config = serde_yaml::from_str(&yaml_str).expect("Failed to deserialize");
        assert_eq!(parsed.report.title, config.report.title);
        assert_eq!(parsed.scorer.traits, config.scorer.traits);
    }
}
