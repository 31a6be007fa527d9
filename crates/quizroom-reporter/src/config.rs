//! quizroom configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http::{DEFAULT_PATH, DEFAULT_TIMEOUT_SECS};

/// Where and how results are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Scheme and host of the results server, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Path the results are posted to.
    #[serde(default = "default_path")]
    pub path: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ReporterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: default_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level quizroom configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizroomConfig {
    /// Results endpoint; reporting is disabled when absent.
    #[serde(default)]
    pub reporter: Option<ReporterConfig>,
    /// Where "quit" and "return to dashboard" send the user.
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    /// Default challenge bank (directory of page files or a JSON file).
    #[serde(default)]
    pub bank: Option<PathBuf>,
    /// Default quiz question file.
    #[serde(default)]
    pub quiz: Option<PathBuf>,
}

fn default_dashboard_url() -> String {
    "/dashboard".to_string()
}

impl Default for QuizroomConfig {
    fn default() -> Self {
        Self {
            reporter: None,
            dashboard_url: default_dashboard_url(),
            bank: None,
            quiz: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Single pass: substituted values are copied verbatim and never expanded
/// again. An unterminated `${` is kept as-is.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quizroom.toml` in the current directory
/// 2. `~/.config/quizroom/config.toml`
///
/// `QUIZROOM_ENDPOINT` overrides `reporter.base_url`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizroomConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizroom.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizroomConfig::default(),
    };

    Ok(apply_env(config, std::env::var("QUIZROOM_ENDPOINT").ok()))
}

pub fn parse_config_str(content: &str) -> Result<QuizroomConfig> {
    Ok(toml::from_str::<QuizroomConfig>(content)?)
}

/// Apply the endpoint override and expand `${VAR}` references.
fn apply_env(mut config: QuizroomConfig, endpoint: Option<String>) -> QuizroomConfig {
    if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
        match config.reporter.as_mut() {
            Some(reporter) => reporter.base_url = endpoint,
            None => config.reporter = Some(ReporterConfig::new(endpoint)),
        }
    }

    if let Some(reporter) = config.reporter.as_mut() {
        reporter.base_url = resolve_env_vars(&reporter.base_url);
        reporter.path = resolve_env_vars(&reporter.path);
    }
    config.dashboard_url = resolve_env_vars(&config.dashboard_url);
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizroom"))
}
