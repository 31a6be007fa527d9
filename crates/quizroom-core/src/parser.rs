//! JSON question bank loader.
//!
//! A challenge is stored as one JSON document per page, named
//! `challenge_page1.json`, `challenge_page2.json`, ... in a single directory,
//! or as one JSON array of page documents. A quiz is a JSON array of
//! questions.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Challenge, Page, Question};

const PAGE_FILE_PREFIX: &str = "challenge_page";

/// Intermediate structure for a page document.
#[derive(Debug, Deserialize)]
struct JsonPage {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<JsonQuestion>,
}

#[derive(Debug, Deserialize)]
struct JsonQuestion {
    #[serde(default)]
    id: Option<String>,
    question: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    learning_content: String,
    #[serde(default, rename = "Clue", alias = "clue", alias = "hint")]
    clue: Option<String>,
}

impl JsonQuestion {
    fn into_question(self, fallback_id: String) -> Question {
        Question {
            id: self.id.unwrap_or(fallback_id),
            prompt: self.question,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            takeaway: self.learning_content,
            hint: self.clue.filter(|c| !c.trim().is_empty()),
        }
    }
}

impl JsonPage {
    /// `number` is 1-based.
    fn into_page(self, number: usize) -> Page {
        let id = self.id.unwrap_or_else(|| format!("page-{number}"));
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| q.into_question(format!("{id}-q{}", i + 1)))
            .collect();
        Page {
            id,
            title: self.title,
            description: self.description,
            questions,
        }
    }
}

/// Parse one page document.
pub fn parse_page_str(content: &str, number: usize, source_path: &Path) -> Result<Page> {
    let page: JsonPage = serde_json::from_str(content)
        .with_context(|| format!("failed to parse page JSON: {}", source_path.display()))?;
    Ok(page.into_page(number))
}

/// Parse a JSON array of page documents into a validated challenge.
pub fn parse_challenge_str(content: &str, source_path: &Path) -> Result<Challenge> {
    let pages: Vec<JsonPage> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse challenge JSON: {}", source_path.display()))?;
    let pages = pages
        .into_iter()
        .enumerate()
        .map(|(i, p)| p.into_page(i + 1))
        .collect();
    Challenge::new(pages).with_context(|| format!("invalid challenge: {}", source_path.display()))
}

pub fn load_challenge_file(path: &Path) -> Result<Challenge> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read challenge file: {}", path.display()))?;
    parse_challenge_str(&content, path)
}

/// Page number encoded in a `challenge_page<N>.json` file name.
fn page_number(path: &Path) -> Option<usize> {
    if !path.extension().is_some_and(|ext| ext == "json") {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(PAGE_FILE_PREFIX)?
        .parse()
        .ok()
}

/// Load every `challenge_page<N>.json` in `dir`, ordered by `N`.
pub fn load_challenge_dir(dir: &Path) -> Result<Challenge> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files: Vec<(usize, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if let Some(number) = page_number(&path) {
            files.push((number, path));
        }
    }
    files.sort();

    for pair in files.windows(2) {
        if pair[0].0 == pair[1].0 {
            anyhow::bail!(
                "duplicate page number {}: {} and {}",
                pair[0].0,
                pair[0].1.display(),
                pair[1].1.display()
            );
        }
    }

    let mut pages = Vec::with_capacity(files.len());
    let mut gap_reported = false;
    for (position, (number, path)) in files.iter().enumerate() {
        if *number != position + 1 && !gap_reported {
            tracing::warn!(
                "page numbering has a gap: expected {PAGE_FILE_PREFIX}{}.json, found {}",
                position + 1,
                path.display()
            );
            gap_reported = true;
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read page file: {}", path.display()))?;
        pages.push(parse_page_str(&content, *number, path)?);
    }
    tracing::debug!(pages = pages.len(), "loaded challenge from {}", dir.display());

    Challenge::new(pages).with_context(|| format!("invalid challenge in {}", dir.display()))
}

/// Load a challenge from a directory of page files or a single JSON file.
pub fn load_challenge(path: &Path) -> Result<Challenge> {
    if path.is_dir() {
        load_challenge_dir(path)
    } else {
        load_challenge_file(path)
    }
}

/// Parse a JSON array of quiz questions.
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Vec<Question>> {
    let questions: Vec<JsonQuestion> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse quiz JSON: {}", source_path.display()))?;
    Ok(questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| q.into_question(format!("q{}", i + 1)))
        .collect())
}

pub fn load_quiz_file(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    parse_quiz_str(&content, path)
}

/// A non-fatal issue found in a question bank.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub message: String,
}

/// Lint a challenge for issues that do not stop it from running.
pub fn validate_challenge(challenge: &Challenge) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for question in challenge.questions() {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in challenge.questions() {
        let mut seen_options = HashSet::new();
        for option in &question.options {
            if !seen_options.insert(option) {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: format!("duplicate option: {option}"),
                });
            }
        }
        if question.explanation.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "explanation is empty".into(),
            });
        }
        if question.takeaway.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "learning content is empty".into(),
            });
        }
        if question.hint.is_none() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "no clue provided".into(),
            });
        }
    }

    for page in challenge.pages() {
        if page.description.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("page '{}' has no description", page.id),
            });
        }
    }

    warnings
}
