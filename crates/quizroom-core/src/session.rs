//! Session state: the single mutable record of a run.

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// A named state of the challenge state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[default]
    Welcome,
    PageIntro,
    Question,
    Feedback,
    PageComplete,
    Complete,
}

/// One answered question, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub page_index: usize,
    pub question_index: usize,
    pub selected: String,
    pub correct: bool,
}

/// Position and scores through a challenge.
///
/// Fields are only written by the engine; everything outside the crate reads
/// them through accessors. `Default` is the initial value and the value a
/// restart returns to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionState {
    pub(crate) page_index: usize,
    pub(crate) question_index: usize,
    pub(crate) page_score: usize,
    pub(crate) total_score: usize,
    pub(crate) phase: Phase,
    pub(crate) feedback_locked: bool,
    pub(crate) last_answer: Option<AnswerRecord>,
    pub(crate) answers: Vec<AnswerRecord>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Correct answers on the current page.
    pub fn page_score(&self) -> usize {
        self.page_score
    }

    /// Correct answers across the whole run.
    pub fn total_score(&self) -> usize {
        self.total_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True only while feedback for the last answer is on screen.
    pub fn feedback_locked(&self) -> bool {
        self.feedback_locked
    }

    /// The answer currently being shown as feedback.
    pub fn last_answer(&self) -> Option<&AnswerRecord> {
        self.last_answer.as_ref()
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub(crate) fn reset_page(&mut self) {
        self.question_index = 0;
        self.page_score = 0;
        self.feedback_locked = false;
        self.last_answer = None;
    }
}

/// Evaluate `selected` against `question` unless the feedback lock is held.
///
/// Returns `None` without touching anything when the lock is already set,
/// otherwise sets the lock and returns whether the answer was correct. The
/// lock check happens before any mutation, so a repeated selection can never
/// be scored twice.
pub(crate) fn answer_once(lock: &mut bool, question: &Question, selected: &str) -> Option<bool> {
    if *lock {
        return None;
    }
    *lock = true;
    Some(question.is_correct(selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::question;

    #[test]
    fn initial_state_is_zeroed_welcome() {
        let state = SessionState::new();
        assert_eq!(state.phase(), Phase::Welcome);
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.question_index(), 0);
        assert_eq!(state.page_score(), 0);
        assert_eq!(state.total_score(), 0);
        assert!(!state.feedback_locked());
        assert!(state.answers().is_empty());
    }

    #[test]
    fn lock_admits_one_answer() {
        let q = question("q1", "A");
        let mut lock = false;
        assert_eq!(answer_once(&mut lock, &q, "A"), Some(true));
        assert!(lock);
        assert_eq!(answer_once(&mut lock, &q, "A"), None);
        assert_eq!(answer_once(&mut lock, &q, "B"), None);
    }

    #[test]
    fn wrong_answer_still_takes_the_lock() {
        let q = question("q1", "A");
        let mut lock = false;
        assert_eq!(answer_once(&mut lock, &q, "X"), Some(false));
        assert!(lock);
    }

    #[test]
    fn phase_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Phase::PageComplete).unwrap(),
            "\"page-complete\""
        );
    }
}
