//! The `quizroom quiz` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizroom_core::parser;
use quizroom_core::quiz::{Factor, Preferences, QuizEngine, QuizEvent, QuizView, Rating};

use super::Delivery;
use crate::presenter::{navigation_message, parse_option, read_line, summary_table};
use quizroom_reporter::load_config_from;

pub async fn execute(
    questions: Option<PathBuf>,
    report: bool,
    dry_run: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let path = questions
        .or_else(|| config.quiz.clone())
        .context("no quiz file given; pass --questions or set `quiz` in quizroom.toml")?;
    let mut quiz = QuizEngine::new(parser::load_quiz_file(&path)?)
        .with_context(|| format!("invalid quiz in {}", path.display()))?;

    let delivery = Delivery::from_flags(&config, report, dry_run)?;
    let mut input = std::io::stdin().lock();

    if !run_quiz(&mut quiz, &mut input) {
        println!("Leaving for {}", config.dashboard_url);
        return Ok(());
    }

    let preferences = collect_preferences(&mut input);
    let payload = quiz
        .report_payload(&preferences)
        .context("quiz ended before the results screen")?;

    match delivery.reporter() {
        None => println!("Thanks! Results were not sent (pass --report to send them)."),
        Some(reporter) => loop {
            match reporter.report(&payload).await {
                Ok(navigation) => {
                    println!("{}", navigation_message(&navigation, delivery.is_dry_run()));
                    break;
                }
                Err(e) => {
                    tracing::warn!("report failed: {e}");
                    eprintln!("Could not send results: {e}");
                    println!("Press Enter to try again, or 'q' to leave.");
                    match read_line(&mut input) {
                        Some(line) if !line.trim().eq_ignore_ascii_case("q") => continue,
                        _ => break,
                    }
                }
            }
        },
    }

    delivery.print_dry_run()
}

fn show(view: &QuizView) {
    println!();
    match view {
        QuizView::Question {
            number,
            question_count,
            prompt,
            options,
            progress,
        } => {
            println!("Question {number} of {question_count} ({:.0}%)", progress * 100.0);
            println!("{prompt}");
            for (i, option) in options.iter().enumerate() {
                println!("  {}) {option}", i + 1);
            }
        }
        QuizView::Feedback {
            correct,
            correct_answer,
            explanation,
            last,
        } => {
            if *correct {
                println!("Correct!");
            } else {
                println!("Incorrect. The correct answer is: {correct_answer}");
            }
            if !explanation.is_empty() {
                println!("{explanation}");
            }
            let next = if *last { "see your results" } else { "continue" };
            println!("Press Enter to {next}.");
        }
        QuizView::Results { summary } => {
            println!("Quiz Complete!");
            println!("{}", summary_table(summary));
            println!("{}", summary.message);
            println!("Type 'r' to retake the quiz, or Enter to rate the treatment factors.");
        }
    }
}

/// Play the quiz until the user leaves the results screen.
///
/// Returns `false` if input ran out first.
fn run_quiz<R: BufRead>(quiz: &mut QuizEngine, input: &mut R) -> bool {
    let mut view = quiz.render();
    show(&view);
    loop {
        let Some(line) = read_line(input) else {
            return false;
        };
        let event = match &view {
            QuizView::Question { options, .. } => match parse_option(options, &line) {
                Some(option) => QuizEvent::SelectOption(option),
                None => {
                    println!("choose an option from 1 to {}", options.len());
                    continue;
                }
            },
            QuizView::Feedback { .. } => QuizEvent::Next,
            QuizView::Results { .. } => match line.trim().to_ascii_lowercase().as_str() {
                "r" | "restart" => QuizEvent::Restart,
                _ => return true,
            },
        };
        view = quiz.apply(event);
        show(&view);
    }
}

/// Ask for a 1-5 rating of each factor. Blank lines skip a factor.
fn collect_preferences<R: BufRead>(input: &mut R) -> Preferences {
    let mut preferences = Preferences::new();
    for factor in Factor::ALL {
        loop {
            println!("Rate {factor} from 1 (low) to 5 (high), or press Enter to skip:");
            let Some(line) = read_line(input) else {
                return preferences;
            };
            if line.trim().is_empty() {
                break;
            }
            match line.parse::<Rating>() {
                Ok(rating) => {
                    preferences.rate(factor, rating);
                    break;
                }
                Err(e) => println!("{e}"),
            }
        }
    }
    preferences
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use quizroom_core::model::Question;
    use quizroom_core::quiz::QuizPhase;

    fn quiz() -> QuizEngine {
        let options = vec!["Chlorine".to_string(), "UV light".to_string()];
        QuizEngine::new(vec![
            Question::new("1", "Forms THMs?", options.clone(), "Chlorine"),
            Question::new("2", "Leaves no residual?", options, "UV light"),
        ])
        .unwrap()
    }

    #[test]
    fn scripted_quiz_reaches_results() {
        let mut quiz = quiz();
        let mut input = Cursor::new("1\n\n3\nUV light\n\n\n");
        assert!(run_quiz(&mut quiz, &mut input));
        assert_eq!(quiz.phase(), QuizPhase::Results);
        assert_eq!(quiz.score(), 2);
    }

    #[test]
    fn quiz_ends_when_input_runs_out() {
        let mut quiz = quiz();
        let mut input = Cursor::new("2\n");
        assert!(!run_quiz(&mut quiz, &mut input));
        assert_eq!(quiz.phase(), QuizPhase::Feedback);
    }

    #[test]
    fn preferences_skip_blank_and_retry_invalid() {
        let mut input = Cursor::new("4\n\n9\n2\n5\n");
        let prefs = collect_preferences(&mut input);
        assert_eq!(prefs.get(Factor::Time).map(Rating::value), Some(4));
        assert_eq!(prefs.get(Factor::Cost), None);
        assert_eq!(prefs.get(Factor::Frequency).map(Rating::value), Some(2));
        assert_eq!(prefs.get(Factor::Effectiveness).map(Rating::value), Some(5));
    }
}
