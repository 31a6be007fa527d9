//! The single-level quiz variant and the preference form that can follow it.
//!
//! A quiz is the challenge machine collapsed to one implicit page:
//! `Question -> Feedback -> (Question | Results)`. It uses the same
//! correctness check and feedback lock as [`ChallengeEngine`](crate::engine::ChallengeEngine).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::model::Question;
use crate::report::{AnswerEntry, AnswerKind, ReportPayload};
use crate::scoring::{progress_fraction, CompletionSummary};
use crate::session::{answer_once, AnswerRecord};

/// Quiz phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizPhase {
    #[default]
    Question,
    Feedback,
    Results,
}

/// Gestures a quiz accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "option", rename_all = "kebab-case")]
pub enum QuizEvent {
    SelectOption(String),
    Next,
    Restart,
}

/// What to show for the current quiz phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QuizView {
    Question {
        number: usize,
        question_count: usize,
        prompt: String,
        options: Vec<String>,
        progress: f64,
    },
    Feedback {
        correct: bool,
        correct_answer: String,
        explanation: String,
        last: bool,
    },
    Results {
        summary: CompletionSummary,
    },
}

/// A flat list of questions answered one after another.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    questions: Vec<Question>,
    index: usize,
    score: usize,
    phase: QuizPhase,
    feedback_locked: bool,
    answers: Vec<AnswerRecord>,
}

impl QuizEngine {
    pub fn new(questions: Vec<Question>) -> Result<Self, ConfigError> {
        if questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        for question in &questions {
            question.check()?;
        }
        Ok(Self {
            questions,
            index: 0,
            score: 0,
            phase: QuizPhase::Question,
            feedback_locked: false,
            answers: Vec::new(),
        })
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn apply(&mut self, event: QuizEvent) -> QuizView {
        let before = self.phase;
        match (self.phase, &event) {
            (_, QuizEvent::Restart) => {
                self.index = 0;
                self.score = 0;
                self.phase = QuizPhase::Question;
                self.feedback_locked = false;
                self.answers.clear();
            }
            (QuizPhase::Question, QuizEvent::SelectOption(selected)) => {
                let question = &self.questions[self.index];
                if let Some(correct) = answer_once(&mut self.feedback_locked, question, selected) {
                    if correct {
                        self.score += 1;
                    }
                    self.answers.push(AnswerRecord {
                        question_id: question.id.clone(),
                        page_index: 0,
                        question_index: self.index,
                        selected: selected.clone(),
                        correct,
                    });
                    self.phase = QuizPhase::Feedback;
                }
            }
            (QuizPhase::Feedback, QuizEvent::Next) => {
                self.feedback_locked = false;
                if self.index + 1 < self.questions.len() {
                    self.index += 1;
                    self.phase = QuizPhase::Question;
                } else {
                    self.phase = QuizPhase::Results;
                }
            }
            _ => {
                trace!(phase = ?before, event = ?event, "ignored quiz event");
            }
        }
        if before != self.phase {
            debug!(from = ?before, to = ?self.phase, "quiz transition");
        }
        self.render()
    }

    pub fn render(&self) -> QuizView {
        let question = &self.questions[self.index];
        match self.phase {
            QuizPhase::Question => QuizView::Question {
                number: self.index + 1,
                question_count: self.questions.len(),
                prompt: question.prompt.clone(),
                options: question.options.clone(),
                progress: progress_fraction(self.index, self.questions.len()),
            },
            QuizPhase::Feedback => QuizView::Feedback {
                correct: self.answers.last().is_some_and(|a| a.correct),
                correct_answer: question.correct_answer.clone(),
                explanation: question.explanation.clone(),
                last: self.index + 1 == self.questions.len(),
            },
            QuizPhase::Results => QuizView::Results {
                summary: CompletionSummary::compute(self.score, self.questions.len()),
            },
        }
    }

    /// Quiz answers followed by the rated preferences; `Some` only in Results.
    pub fn report_payload(&self, preferences: &Preferences) -> Option<ReportPayload> {
        if self.phase != QuizPhase::Results {
            return None;
        }
        let mut answers: Vec<AnswerEntry> = self
            .answers
            .iter()
            .map(|record| AnswerEntry {
                id: Some(record.question_id.clone()),
                question: self.questions[record.question_index].prompt.clone(),
                selected: record.selected.clone(),
                kind: AnswerKind::Quiz,
            })
            .collect();
        answers.extend(preferences.entries());
        Some(ReportPayload { answers })
    }
}

/// A factor the user rates after the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    Time,
    Cost,
    Frequency,
    Effectiveness,
}

impl Factor {
    /// Display and report order.
    pub const ALL: [Factor; 4] = [
        Factor::Time,
        Factor::Cost,
        Factor::Frequency,
        Factor::Effectiveness,
    ];
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Time => write!(f, "Time"),
            Factor::Cost => write!(f, "Cost"),
            Factor::Frequency => write!(f, "Frequency"),
            Factor::Effectiveness => write!(f, "Effectiveness"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct RatingError(pub String);

/// A 1–5 rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError(value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.trim().parse().map_err(|_| RatingError(s.to_string()))?;
        Rating::new(value)
    }
}

/// Ratings collected after a quiz. Unrated factors are left out of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    ratings: Vec<(Factor, Rating)>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate `factor`, replacing an earlier rating.
    pub fn rate(&mut self, factor: Factor, rating: Rating) {
        match self.ratings.iter_mut().find(|(f, _)| *f == factor) {
            Some(entry) => entry.1 = rating,
            None => self.ratings.push((factor, rating)),
        }
    }

    pub fn get(&self, factor: Factor) -> Option<Rating> {
        self.ratings
            .iter()
            .find(|(f, _)| *f == factor)
            .map(|(_, r)| *r)
    }

    /// Report entries in [`Factor::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = AnswerEntry> + '_ {
        Factor::ALL.into_iter().filter_map(|factor| {
            self.get(factor).map(|rating| AnswerEntry {
                id: None,
                question: factor.to_string(),
                selected: rating.value().to_string(),
                kind: AnswerKind::Preference,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::question;
    use crate::scoring::Tier;

    fn quiz() -> QuizEngine {
        QuizEngine::new(vec![question("q1", "A"), question("q2", "B")]).unwrap()
    }

    #[test]
    fn runs_to_results() {
        let mut quiz = quiz();
        quiz.apply(QuizEvent::SelectOption("A".into()));
        quiz.apply(QuizEvent::Next);
        quiz.apply(QuizEvent::SelectOption("X".into()));
        let view = quiz.apply(QuizEvent::Next);
        assert_eq!(quiz.phase(), QuizPhase::Results);
        match view {
            QuizView::Results { summary } => {
                assert_eq!(summary.correct, 1);
                assert_eq!(summary.percentage, 50);
                assert_eq!(summary.tier, Tier::Fair);
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn double_selection_scores_once() {
        let mut quiz = quiz();
        quiz.apply(QuizEvent::SelectOption("A".into()));
        quiz.apply(QuizEvent::SelectOption("A".into()));
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.answers().len(), 1);
        assert_eq!(quiz.phase(), QuizPhase::Feedback);
    }

    #[test]
    fn feedback_marks_last_question() {
        let mut quiz = quiz();
        quiz.apply(QuizEvent::SelectOption("A".into()));
        quiz.apply(QuizEvent::Next);
        let view = quiz.apply(QuizEvent::SelectOption("B".into()));
        assert_eq!(
            view,
            QuizView::Feedback {
                correct: true,
                correct_answer: "B".into(),
                explanation: "Because B.".into(),
                last: true,
            }
        );
    }

    #[test]
    fn restart_clears_answers() {
        let mut quiz = quiz();
        quiz.apply(QuizEvent::SelectOption("A".into()));
        quiz.apply(QuizEvent::Restart);
        assert_eq!(quiz.phase(), QuizPhase::Question);
        assert_eq!(quiz.score(), 0);
        assert!(quiz.answers().is_empty());
    }

    #[test]
    fn empty_quiz_is_a_config_error() {
        assert_eq!(
            QuizEngine::new(vec![]).unwrap_err(),
            ConfigError::NoQuestions
        );
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(5).unwrap().value(), 5);
        assert_eq!("3".parse::<Rating>().unwrap().value(), 3);
        assert!("three".parse::<Rating>().is_err());
    }

    #[test]
    fn payload_appends_preferences_in_factor_order() {
        let mut quiz = quiz();
        for option in ["A", "B"] {
            quiz.apply(QuizEvent::SelectOption(option.into()));
            quiz.apply(QuizEvent::Next);
        }
        let mut prefs = Preferences::new();
        prefs.rate(Factor::Effectiveness, Rating::new(5).unwrap());
        prefs.rate(Factor::Time, Rating::new(2).unwrap());
        prefs.rate(Factor::Time, Rating::new(3).unwrap());

        let payload = quiz.report_payload(&prefs).unwrap();
        let summary: Vec<_> = payload
            .answers
            .iter()
            .map(|a| (a.question.as_str(), a.selected.as_str(), a.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Prompt for q1?", "A", AnswerKind::Quiz),
                ("Prompt for q2?", "B", AnswerKind::Quiz),
                ("Time", "3", AnswerKind::Preference),
                ("Effectiveness", "5", AnswerKind::Preference),
            ]
        );
        assert!(payload.answers[2].id.is_none());
    }

    #[test]
    fn no_payload_before_results() {
        assert!(quiz().report_payload(&Preferences::new()).is_none());
    }
}
