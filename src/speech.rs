//! Speech-to-text collaborator
//!
//! Transcription is delegated to an external command that records and
//! transcribes audio, then prints the transcript on stdout. Failures degrade to
//! an empty transcript, but the failure kind is kept so callers can tell it
//! apart from silence.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use eyre::Context;
use serde::Serialize;
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TranscriptionFailure {
    /// No transcription command configured, or not found on PATH
    Unavailable(String),
    Timeout(u64),
    CommandFailed(String),
    /// Command succeeded but produced no text
    Empty,
}

impl fmt::Display for TranscriptionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptionFailure::Unavailable(why) => write!(f, "speech recognition unavailable: {}", why),
            TranscriptionFailure::Timeout(secs) => write!(f, "speech recognition timed out after {}s", secs),
            TranscriptionFailure::CommandFailed(why) => write!(f, "speech recognition failed: {}", why),
            TranscriptionFailure::Empty => write!(f, "no speech recognized"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub text: String,
    pub failure: Option<TranscriptionFailure>,
}

impl Transcript {
    pub fn ok(text: String) -> Self {
        Self { text, failure: None }
    }

    pub fn failed(failure: TranscriptionFailure) -> Self {
        Self {
            text: String::new(),
            failure: Some(failure),
        }
    }
}

pub trait Transcriber {
    fn transcribe(&self) -> Transcript;
}

/// Runs a configured command and takes its stdout as the transcript
pub struct CommandTranscriber {
    command: Vec<String>,
    timeout: Duration,
}

impl CommandTranscriber {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }
}

impl CommandTranscriber {
    async fn run(&self, program: &std::path::Path, args: &[String]) -> Transcript {
        log::info!("Running speech command: {} {:?}", program.display(), args);
        let child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return Transcript::failed(TranscriptionFailure::CommandFailed(e.to_string())),
        };

        // dropping the child on timeout kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Transcript::failed(TranscriptionFailure::CommandFailed(e.to_string())),
            Err(_) => {
                log::warn!("Speech command timed out after {:?}", self.timeout);
                return Transcript::failed(TranscriptionFailure::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            return Transcript::failed(TranscriptionFailure::CommandFailed(format!(
                "exited with {}",
                output.status
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            Transcript::failed(TranscriptionFailure::Empty)
        } else {
            Transcript::ok(text)
        }
    }
}

impl Transcriber for CommandTranscriber {
    fn transcribe(&self) -> Transcript {
        let Some((program, args)) = self.command.split_first() else {
            return Transcript::failed(TranscriptionFailure::Unavailable(
                "no speech.command configured".to_string(),
            ));
        };

        let resolved = match which::which(program) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Speech command '{}' not found: {}", program, e);
                return Transcript::failed(TranscriptionFailure::Unavailable(format!("{}: {}", program, e)));
            }
        };

        let rt = match tokio::runtime::Runtime::new().context("Failed to create tokio runtime") {
            Ok(rt) => rt,
            Err(e) => return Transcript::failed(TranscriptionFailure::CommandFailed(format!("{:#}", e))),
        };
        rt.block_on(self.run(&resolved, args))
    }
}
