pub mod init;
pub mod play;
pub mod quiz;
pub mod replay;
pub mod validate;

use anyhow::{Context, Result};

use quizroom_core::traits::ResultReporter;
use quizroom_reporter::{HttpReporter, MockReporter, QuizroomConfig};

/// The reporter a session hands its results to.
pub(crate) enum Delivery {
    None,
    Http(HttpReporter),
    /// Accepts everything and keeps the payload for printing.
    DryRun(MockReporter),
}

impl Delivery {
    pub(crate) fn from_flags(config: &QuizroomConfig, report: bool, dry_run: bool) -> Result<Self> {
        if dry_run {
            return Ok(Delivery::DryRun(MockReporter::succeeding(&config.dashboard_url)));
        }
        if !report {
            return Ok(Delivery::None);
        }
        let reporter_config = config.reporter.as_ref().context(
            "no results endpoint configured; add a [reporter] section to quizroom.toml or set QUIZROOM_ENDPOINT",
        )?;
        let reporter = HttpReporter::from_config(reporter_config)?;
        tracing::info!(endpoint = reporter.endpoint(), "reporting results");
        Ok(Delivery::Http(reporter))
    }

    pub(crate) fn reporter(&self) -> Option<&dyn ResultReporter> {
        match self {
            Delivery::None => None,
            Delivery::Http(reporter) => Some(reporter),
            Delivery::DryRun(reporter) => Some(reporter),
        }
    }

    pub(crate) fn is_dry_run(&self) -> bool {
        matches!(self, Delivery::DryRun(_))
    }

    /// Print the payload a dry run captured.
    pub(crate) fn print_dry_run(&self) -> Result<()> {
        if let Delivery::DryRun(mock) = self {
            if let Some(payload) = mock.last_payload() {
                println!("\nResults payload (dry run, not sent):");
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
        }
        Ok(())
    }
}
