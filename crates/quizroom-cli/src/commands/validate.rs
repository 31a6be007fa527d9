//! The `quizroom validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizroom_core::parser;

pub fn execute(bank: PathBuf) -> Result<()> {
    let challenge = parser::load_challenge(&bank)?;

    println!(
        "Challenge: {} ({} pages, {} questions)",
        bank.display(),
        challenge.page_count(),
        challenge.total_questions()
    );
    for (i, page) in challenge.pages().iter().enumerate() {
        println!(
            "  Room {}: {} ({} questions)",
            i + 1,
            page.title,
            page.question_count()
        );
    }

    let warnings = parser::validate_challenge(&challenge);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Challenge bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
