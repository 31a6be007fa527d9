//! The `quizroom replay` command.

use std::path::PathBuf;

use anyhow::{bail, Result};

use quizroom_core::engine::{ChallengeEngine, Event};
use quizroom_core::parser;

pub fn execute(bank: PathBuf, events: String) -> Result<()> {
    let challenge = parser::load_challenge(&bank)?;
    let events = parse_events(&events)?;

    let mut engine = ChallengeEngine::new(challenge);
    let mut render = engine.render();
    for event in events {
        render = engine.apply(event);
    }

    println!("{}", serde_json::to_string_pretty(&render)?);
    Ok(())
}

/// Parse `start,begin,select:<option>,next,continue,restart`.
///
/// Everything after `select:` up to the next comma is the option text, kept
/// verbatim.
fn parse_events(script: &str) -> Result<Vec<Event>> {
    script
        .split(',')
        .filter(|token| !token.trim().is_empty())
        .map(|token| {
            if let Some(option) = token.trim_start().strip_prefix("select:") {
                return Ok(Event::SelectOption(option.to_string()));
            }
            Ok(match token.trim() {
                "start" => Event::Start,
                "begin" => Event::BeginSection,
                "next" => Event::Next,
                "continue" => Event::ContinueSection,
                "restart" => Event::Restart,
                other => bail!("unknown event '{other}'"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_event_kinds() {
        let events = parse_events("start, begin,select:UV light,next,continue,restart").unwrap();
        assert_eq!(
            events,
            vec![
                Event::Start,
                Event::BeginSection,
                Event::SelectOption("UV light".into()),
                Event::Next,
                Event::ContinueSection,
                Event::Restart,
            ]
        );
    }

    #[test]
    fn empty_script_is_no_events() {
        assert!(parse_events("").unwrap().is_empty());
    }

    #[test]
    fn unknown_event_is_an_error() {
        let err = parse_events("start,jump").unwrap_err();
        assert!(err.to_string().contains("unknown event 'jump'"));
    }
}
