//! The `quizroom play` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizroom_core::engine::{run_session, ChallengeEngine};
use quizroom_core::parser;
use quizroom_reporter::load_config_from;

use super::Delivery;
use crate::presenter::TerminalPresenter;

pub async fn execute(
    bank: Option<PathBuf>,
    report: bool,
    dry_run: bool,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let bank = bank
        .or_else(|| config.bank.clone())
        .context("no challenge bank given; pass --bank or set `bank` in quizroom.toml")?;
    let challenge = parser::load_challenge(&bank)?;
    tracing::debug!(
        pages = challenge.page_count(),
        questions = challenge.total_questions(),
        "loaded challenge from {}",
        bank.display()
    );

    let delivery = Delivery::from_flags(&config, report, dry_run)?;

    let mut engine = ChallengeEngine::new(challenge);
    let mut presenter = TerminalPresenter::new(std::io::stdin().lock(), &config.dashboard_url)
        .with_dry_run(delivery.is_dry_run());
    let navigation = run_session(&mut engine, &mut presenter, delivery.reporter()).await;

    delivery.print_dry_run()?;

    if let Some(dir) = output {
        match engine.completion_record() {
            Some(record) => {
                let path = dir.join(format!("run-{}.json", record.id));
                record.save_json(&path)?;
                println!("Completion record saved to {}", path.display());
            }
            None => println!("Challenge not completed; no record saved."),
        }
    }

    if navigation.is_none() && report && engine.summary().is_some() {
        tracing::warn!("challenge completed but results were not delivered");
    }

    Ok(())
}
