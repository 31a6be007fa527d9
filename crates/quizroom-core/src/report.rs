//! Result reporting payloads and run transcripts.
//!
//! [`ReportPayload`] is the JSON body posted to the results endpoint.
//! [`CompletionRecord`] is a local transcript of a finished run that the CLI
//! can write next to its other output.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::CompletionSummary;
use crate::session::AnswerRecord;

/// Where an answer entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    Quiz,
    Preference,
}

/// One element of the `answers` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    /// Question id; preference entries carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Question prompt or preference factor label.
    pub question: String,
    /// The selected option, or the rating as a string.
    pub selected: String,
    #[serde(rename = "type")]
    pub kind: AnswerKind,
}

/// Body of `POST /action_reaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub answers: Vec<AnswerEntry>,
}

impl ReportPayload {
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Where the endpoint wants the user to go next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub redirect_url: String,
}

/// A finished run, suitable for persisting as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the run reached completion.
    pub completed_at: DateTime<Utc>,
    pub summary: CompletionSummary,
    pub answers: Vec<AnswerRecord>,
}

impl CompletionRecord {
    pub fn new(summary: CompletionSummary, answers: Vec<AnswerRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            completed_at: Utc::now(),
            summary,
            answers,
        }
    }

    /// Save the record as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize record")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write record to {}", path.display()))?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read record from {}", path.display()))?;
        let record: CompletionRecord =
            serde_json::from_str(&content).context("failed to parse record JSON")?;
        Ok(record)
    }
}
