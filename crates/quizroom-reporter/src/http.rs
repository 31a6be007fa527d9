//! HTTP result reporter.
//!
//! Posts `{"answers": [...]}` as JSON and expects the
//! `{"status": "success", "redirect_url": ...}` envelope back.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use quizroom_core::error::ReportError;
use quizroom_core::report::{Navigation, ReportPayload};
use quizroom_core::traits::ResultReporter;

use crate::config::ReporterConfig;

pub const DEFAULT_PATH: &str = "/action_reaction";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Reports results to a remote endpoint. One attempt per call, no retry.
pub struct HttpReporter {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpReporter {
    pub fn new(base_url: &str, path: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        anyhow::ensure!(!base_url.trim().is_empty(), "reporter base_url is empty");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        let path = if path.is_empty() { DEFAULT_PATH } else { path };
        let endpoint = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        Ok(Self {
            endpoint,
            timeout_secs,
            client,
        })
    }

    pub fn from_config(config: &ReporterConfig) -> anyhow::Result<Self> {
        Self::new(&config.base_url, &config.path, config.timeout_secs)
    }

    /// Full URL results are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

impl Envelope {
    fn into_outcome(self) -> Result<Navigation, ReportError> {
        match self.status.as_str() {
            "success" => match self.redirect_url {
                Some(url) if !url.is_empty() => Ok(Navigation { redirect_url: url }),
                _ => Err(ReportError::InvalidResponse(
                    "success response without redirect_url".into(),
                )),
            },
            "error" => {
                let message = self
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| {
                        if self.errors.is_empty() {
                            "unspecified error".to_string()
                        } else {
                            self.errors.join("; ")
                        }
                    });
                Err(ReportError::Rejected {
                    message,
                    errors: self.errors,
                })
            }
            other => Err(ReportError::InvalidResponse(format!(
                "unexpected status '{other}'"
            ))),
        }
    }
}

#[async_trait]
impl ResultReporter for HttpReporter {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint, answers = payload.len()))]
    async fn report(&self, payload: &ReportPayload) -> Result<Navigation, ReportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReportError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ReportError::Network(format!("endpoint not reachable at {}", self.endpoint))
                } else {
                    ReportError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ReportError::Timeout(self.timeout_secs)
            } else {
                ReportError::Network(e.to_string())
            }
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "results endpoint returned an error");
            return Err(ReportError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
            ReportError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;
        let outcome = envelope.into_outcome();
        if let Ok(navigation) = &outcome {
            tracing::info!(redirect = %navigation.redirect_url, "results accepted");
        }
        outcome
    }
}
