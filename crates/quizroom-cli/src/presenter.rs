//! Line-oriented terminal presenter.

use std::io::BufRead;

use comfy_table::{Cell, Table};

use quizroom_core::engine::{Event, Presenter, Render, View};
use quizroom_core::error::ReportError;
use quizroom_core::report::Navigation;
use quizroom_core::scoring::CompletionSummary;
use quizroom_core::session::Phase;

/// What a line of input means in the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Event(Event),
    Quit,
    Invalid(String),
}

/// Map a line typed by the user to an engine event.
///
/// Quitting is only offered on the welcome and completion screens.
pub fn parse_input(render: &Render, line: &str) -> Input {
    let line = line.trim();
    match (&render.view, line.to_ascii_lowercase().as_str()) {
        (View::Welcome { .. }, "" | "s" | "start") => Input::Event(Event::Start),
        (View::Welcome { .. } | View::Complete { .. }, "q" | "quit") => Input::Quit,
        (View::Welcome { .. }, _) => Input::Invalid("type 's' to start or 'q' to quit".into()),
        (View::PageIntro { .. }, _) => Input::Event(Event::BeginSection),
        (View::Question { options, .. }, _) => match parse_option(options, line) {
            Some(option) => Input::Event(Event::SelectOption(option)),
            None => Input::Invalid(format!("choose an option from 1 to {}", options.len())),
        },
        (View::Feedback { .. }, _) => Input::Event(Event::Next),
        (View::PageComplete { .. }, _) => Input::Event(Event::ContinueSection),
        (View::Complete { .. }, "r" | "restart") => Input::Event(Event::Restart),
        (View::Complete { .. }, "") => Input::Quit,
        (View::Complete { .. }, _) => {
            Input::Invalid("type 'r' to take the challenge again or 'q' to leave".into())
        }
    }
}

/// Resolve a 1-based option number or the exact option text.
pub fn parse_option(options: &[String], line: &str) -> Option<String> {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        if (1..=options.len()).contains(&n) {
            return Some(options[n - 1].clone());
        }
    }
    options.iter().find(|o| o.as_str() == line).cloned()
}

/// Read one line, `None` at end of input.
pub fn read_line<R: BufRead>(input: &mut R) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) => {
            tracing::warn!("failed to read input: {e}");
            None
        }
    }
}

/// Reads gestures from `input` and prints each phase to stdout.
pub struct TerminalPresenter<R> {
    input: R,
    dashboard_url: String,
    dry_run: bool,
    last: Option<Render>,
}

impl<R: BufRead> TerminalPresenter<R> {
    pub fn new(input: R, dashboard_url: impl Into<String>) -> Self {
        Self {
            input,
            dashboard_url: dashboard_url.into(),
            dry_run: false,
            last: None,
        }
    }

    /// Results go to a stand-in reporter; say so instead of "sent".
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl<R: BufRead> Presenter for TerminalPresenter<R> {
    fn present(&mut self, render: &Render) {
        println!();
        println!(
            "[{}] {:>3.0}%",
            render.progress.label,
            render.progress.fraction * 100.0
        );
        match &render.view {
            View::Welcome {
                page_count,
                total_questions,
            } => {
                println!("Welcome! {page_count} rooms, {total_questions} questions in total.");
                println!("Once you start you cannot leave until the end.");
                println!("Press Enter to start, or 'q' to quit.");
            }
            View::PageIntro {
                title,
                description,
                question_count,
                ..
            } => {
                println!("== {title} ==");
                if !description.is_empty() {
                    println!("{description}");
                }
                println!("Questions in this section: {question_count}");
                println!("Press Enter to begin.");
            }
            View::Question {
                number,
                question_count,
                prompt,
                options,
                hint,
            } => {
                println!("Question {number} of {question_count}");
                println!("{prompt}");
                for (i, option) in options.iter().enumerate() {
                    println!("  {}) {option}", i + 1);
                }
                if let Some(hint) = hint {
                    println!("Clue: {hint}");
                }
            }
            View::Feedback {
                correct,
                correct_answer,
                explanation,
                takeaway,
                last_in_page,
                ..
            } => {
                if *correct {
                    println!("Excellent! {correct_answer} is the right answer.");
                } else {
                    println!("Not quite right. The correct answer is: {correct_answer}");
                }
                if !explanation.is_empty() {
                    println!("Explanation: {explanation}");
                }
                if !takeaway.is_empty() {
                    println!("Key takeaway: {takeaway}");
                }
                let next = if *last_in_page { "complete the section" } else { "continue" };
                println!("Press Enter to {next}.");
            }
            View::PageComplete {
                title,
                page_score,
                question_count,
                percentage,
                takeaways,
                last_page,
            } => {
                println!("Section complete: {title}");
                println!("Score: {page_score}/{question_count} ({percentage}%)");
                for takeaway in takeaways.iter().filter(|t| !t.is_empty()) {
                    println!("  - {takeaway}");
                }
                if *last_page {
                    println!("Press Enter to complete the challenge.");
                } else {
                    println!("Press Enter to continue to the next section.");
                }
            }
            View::Complete { summary } => {
                println!("Challenge Complete!");
                println!("{}", summary_table(summary));
                println!("{}", summary.message);
                println!("Type 'r' to take the challenge again, or Enter to leave.");
            }
        }
        self.last = Some(render.clone());
    }

    fn next_event(&mut self) -> Option<Event> {
        loop {
            let line = read_line(&mut self.input)?;
            let render = self.last.as_ref()?;
            match parse_input(render, &line) {
                Input::Event(event) => return Some(event),
                Input::Quit => {
                    if render.phase == Phase::Complete {
                        println!("Returning to {}", self.dashboard_url);
                    } else {
                        println!("Leaving for {}", self.dashboard_url);
                    }
                    return None;
                }
                Input::Invalid(hint) => println!("{hint}"),
            }
        }
    }

    fn navigate(&mut self, navigation: &Navigation) {
        println!("{}", navigation_message(navigation, self.dry_run));
    }

    fn report_failed(&mut self, error: &ReportError) {
        eprintln!("Could not send results: {error}");
    }
}

pub fn navigation_message(navigation: &Navigation, dry_run: bool) -> String {
    if dry_run {
        format!("Dry run, results not sent. Would continue at {}", navigation.redirect_url)
    } else {
        format!("Results sent. Continue at {}", navigation.redirect_url)
    }
}

pub fn summary_table(summary: &CompletionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Correct", "Total", "Score", "Tier"]);
    table.add_row(vec![
        Cell::new(summary.correct),
        Cell::new(summary.total),
        Cell::new(format!("{}%", summary.percentage)),
        Cell::new(summary.tier),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizroom_core::engine::ChallengeEngine;
    use quizroom_core::model::{Page, Question};

    fn engine() -> ChallengeEngine {
        let q = Question::new(
            "q1",
            "Which one?",
            vec!["Chlorine".into(), "Oxygen".into()],
            "Chlorine",
        );
        ChallengeEngine::from_pages(vec![Page::new("p1", "Lab", vec![q])]).unwrap()
    }

    #[test]
    fn welcome_inputs() {
        let render = engine().render();
        assert_eq!(parse_input(&render, "\n"), Input::Event(Event::Start));
        assert_eq!(parse_input(&render, "Q"), Input::Quit);
        assert!(matches!(parse_input(&render, "x"), Input::Invalid(_)));
    }

    #[test]
    fn question_inputs_by_number_or_text() {
        let mut engine = engine();
        engine.apply(Event::Start);
        let render = engine.apply(Event::BeginSection);
        assert_eq!(
            parse_input(&render, "2\n"),
            Input::Event(Event::SelectOption("Oxygen".into()))
        );
        assert_eq!(
            parse_input(&render, "Chlorine"),
            Input::Event(Event::SelectOption("Chlorine".into()))
        );
        assert!(matches!(parse_input(&render, "3"), Input::Invalid(_)));
        assert!(matches!(parse_input(&render, "q"), Input::Invalid(_)));
    }

    #[test]
    fn completion_inputs() {
        let mut engine = engine();
        for event in [
            Event::Start,
            Event::BeginSection,
            Event::SelectOption("Chlorine".into()),
            Event::Next,
        ] {
            engine.apply(event);
        }
        let render = engine.apply(Event::ContinueSection);
        assert_eq!(render.phase, Phase::Complete);
        assert_eq!(parse_input(&render, "r"), Input::Event(Event::Restart));
        assert_eq!(parse_input(&render, ""), Input::Quit);
    }

    #[test]
    fn dry_run_navigation_is_not_reported_as_sent() {
        let navigation = Navigation {
            redirect_url: "/dashboard".into(),
        };
        assert_eq!(
            navigation_message(&navigation, true),
            "Dry run, results not sent. Would continue at /dashboard"
        );
        assert!(navigation_message(&navigation, false).starts_with("Results sent."));
    }

    #[test]
    fn summary_table_lists_tier() {
        let table = summary_table(&CompletionSummary::compute(9, 10)).to_string();
        assert!(table.contains("90%"));
        assert!(table.contains("excellent"));
    }
}
