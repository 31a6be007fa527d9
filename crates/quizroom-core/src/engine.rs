//! The challenge state machine.
//!
//! ```text
//! Welcome -> PageIntro -> Question -> Feedback -> PageComplete -> (PageIntro | Complete)
//!                            ^            |
//!                            +------------+  (Next, more questions on the page)
//! ```
//!
//! Every gesture from the presenter arrives as an [`Event`] and goes through
//! [`ChallengeEngine::apply`], which updates the session and returns a
//! [`Render`] describing what to show. Events that make no sense in the
//! current phase are ignored. `Restart` is accepted everywhere.

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::{ConfigError, ReportError};
use crate::model::{Challenge, Page, Question};
use crate::report::{AnswerEntry, AnswerKind, CompletionRecord, Navigation, ReportPayload};
use crate::scoring::{percentage, progress_fraction, CompletionSummary};
use crate::session::{answer_once, AnswerRecord, Phase, SessionState};
use crate::traits::ResultReporter;

/// A user gesture, translated by the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "option", rename_all = "kebab-case")]
pub enum Event {
    Start,
    BeginSection,
    SelectOption(String),
    Next,
    ContinueSection,
    Restart,
}

/// Score counters at the moment of rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSnapshot {
    pub page_score: usize,
    pub page_questions: usize,
    pub total_score: usize,
    pub total_questions: usize,
}

/// Progress bar state. Display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub label: String,
    pub fraction: f64,
}

/// Phase-specific data for the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum View {
    Welcome {
        page_count: usize,
        total_questions: usize,
    },
    PageIntro {
        page_index: usize,
        title: String,
        description: String,
        question_count: usize,
    },
    Question {
        /// 1-based.
        number: usize,
        question_count: usize,
        prompt: String,
        options: Vec<String>,
        hint: Option<String>,
    },
    Feedback {
        question_id: String,
        correct: bool,
        selected: String,
        correct_answer: String,
        explanation: String,
        takeaway: String,
        /// Whether `Next` leads to the page summary rather than another question.
        last_in_page: bool,
    },
    PageComplete {
        title: String,
        page_score: usize,
        question_count: usize,
        percentage: u32,
        takeaways: Vec<String>,
        /// Whether `ContinueSection` finishes the challenge.
        last_page: bool,
    },
    Complete {
        summary: CompletionSummary,
    },
}

/// Everything a presenter needs to draw the current phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Render {
    pub phase: Phase,
    pub view: View,
    pub score: ScoreSnapshot,
    pub progress: Progress,
}

/// Renders engine output and turns user gestures into events.
///
/// Presenters own no assessment logic.
pub trait Presenter {
    fn present(&mut self, render: &Render);

    /// The next gesture, or `None` when the user navigates away.
    fn next_event(&mut self) -> Option<Event>;

    fn navigate(&mut self, _navigation: &Navigation) {}

    /// A report attempt failed. The run itself is unaffected.
    fn report_failed(&mut self, _error: &ReportError) {}
}

/// Owns a challenge and the session state moving through it.
#[derive(Debug, Clone)]
pub struct ChallengeEngine {
    challenge: Challenge,
    state: SessionState,
}

impl ChallengeEngine {
    pub fn new(challenge: Challenge) -> Self {
        Self {
            challenge,
            state: SessionState::new(),
        }
    }

    /// Validate `pages` and build an engine, refusing to start on a bad bank.
    pub fn from_pages(pages: Vec<Page>) -> Result<Self, ConfigError> {
        Ok(Self::new(Challenge::new(pages)?))
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Process one event to completion and describe the resulting phase.
    pub fn apply(&mut self, event: Event) -> Render {
        let before = self.state.phase;
        if self.transition(&event) {
            debug!(from = ?before, to = ?self.state.phase, event = ?event, "transition");
        } else {
            trace!(phase = ?before, event = ?event, "ignored event");
        }
        self.render()
    }

    /// Returns `false` when the event was ignored.
    fn transition(&mut self, event: &Event) -> bool {
        let state = &mut self.state;
        match (state.phase, event) {
            (_, Event::Restart) => {
                *state = SessionState::default();
            }
            (Phase::Welcome, Event::Start) => {
                *state = SessionState::default();
                state.phase = Phase::PageIntro;
            }
            (Phase::PageIntro, Event::BeginSection) => {
                state.question_index = 0;
                state.feedback_locked = false;
                state.phase = Phase::Question;
            }
            (Phase::Question, Event::SelectOption(selected)) => {
                let Some(question) = self
                    .challenge
                    .page(state.page_index)
                    .and_then(|p| p.questions.get(state.question_index))
                else {
                    return false;
                };
                let Some(correct) = answer_once(&mut state.feedback_locked, question, selected)
                else {
                    return false;
                };
                if correct {
                    state.page_score += 1;
                    state.total_score += 1;
                }
                let record = AnswerRecord {
                    question_id: question.id.clone(),
                    page_index: state.page_index,
                    question_index: state.question_index,
                    selected: selected.clone(),
                    correct,
                };
                state.answers.push(record.clone());
                state.last_answer = Some(record);
                state.phase = Phase::Feedback;
            }
            (Phase::Feedback, Event::Next) => {
                let count = self.challenge.pages()[state.page_index].question_count();
                state.question_index += 1;
                state.feedback_locked = false;
                state.last_answer = None;
                state.phase = if state.question_index < count {
                    Phase::Question
                } else {
                    Phase::PageComplete
                };
            }
            (Phase::PageComplete, Event::ContinueSection) => {
                if state.page_index + 1 < self.challenge.page_count() {
                    state.page_index += 1;
                    state.reset_page();
                    state.phase = Phase::PageIntro;
                } else {
                    state.phase = Phase::Complete;
                }
            }
            _ => return false,
        }
        true
    }

    fn current_page(&self) -> &Page {
        // page_index never leaves [0, page_count) and a challenge has pages.
        &self.challenge.pages()[self.state.page_index]
    }

    fn current_question(&self) -> Option<&Question> {
        self.current_page().questions.get(self.state.question_index)
    }

    pub fn score(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            page_score: self.state.page_score,
            page_questions: self.current_page().question_count(),
            total_score: self.state.total_score,
            total_questions: self.challenge.total_questions(),
        }
    }

    fn progress(&self) -> Progress {
        let page_count = self.challenge.page_count();
        match self.state.phase {
            Phase::Welcome => Progress {
                label: "Ready to start".into(),
                fraction: 0.0,
            },
            Phase::Complete => Progress {
                label: "Challenge Complete!".into(),
                fraction: 1.0,
            },
            _ => Progress {
                label: format!("Room {} of {}", self.state.page_index + 1, page_count),
                fraction: progress_fraction(self.state.page_index, page_count),
            },
        }
    }

    /// Final summary; `Some` only in [`Phase::Complete`].
    ///
    /// Recomputed from the counters on every call.
    pub fn summary(&self) -> Option<CompletionSummary> {
        (self.state.phase == Phase::Complete).then(|| {
            CompletionSummary::compute(self.state.total_score, self.challenge.total_questions())
        })
    }

    /// Describe the current phase without changing anything.
    pub fn render(&self) -> Render {
        let page = self.current_page();
        let view = match self.state.phase {
            Phase::Welcome => View::Welcome {
                page_count: self.challenge.page_count(),
                total_questions: self.challenge.total_questions(),
            },
            Phase::PageIntro => View::PageIntro {
                page_index: self.state.page_index,
                title: page.title.clone(),
                description: page.description.clone(),
                question_count: page.question_count(),
            },
            Phase::Question => {
                // The machine only sits in Question with a valid index.
                let question = &page.questions[self.state.question_index];
                View::Question {
                    number: self.state.question_index + 1,
                    question_count: page.question_count(),
                    prompt: question.prompt.clone(),
                    options: question.options.clone(),
                    hint: question.hint.clone(),
                }
            }
            Phase::Feedback => self.feedback_view(),
            Phase::PageComplete => View::PageComplete {
                title: page.title.clone(),
                page_score: self.state.page_score,
                question_count: page.question_count(),
                percentage: percentage(self.state.page_score, page.question_count()),
                takeaways: page.questions.iter().map(|q| q.takeaway.clone()).collect(),
                last_page: self.state.page_index + 1 == self.challenge.page_count(),
            },
            Phase::Complete => View::Complete {
                summary: CompletionSummary::compute(
                    self.state.total_score,
                    self.challenge.total_questions(),
                ),
            },
        };
        Render {
            phase: self.state.phase,
            view,
            score: self.score(),
            progress: self.progress(),
        }
    }

    fn feedback_view(&self) -> View {
        let page = self.current_page();
        let question = self.current_question();
        let answer = self.state.last_answer.as_ref();
        View::Feedback {
            question_id: question.map(|q| q.id.clone()).unwrap_or_default(),
            correct: answer.is_some_and(|a| a.correct),
            selected: answer.map(|a| a.selected.clone()).unwrap_or_default(),
            correct_answer: question.map(|q| q.correct_answer.clone()).unwrap_or_default(),
            explanation: question.map(|q| q.explanation.clone()).unwrap_or_default(),
            takeaway: question.map(|q| q.takeaway.clone()).unwrap_or_default(),
            last_in_page: self.state.question_index + 1 >= page.question_count(),
        }
    }

    /// One quiz entry per answered question; `Some` only once complete.
    pub fn report_payload(&self) -> Option<ReportPayload> {
        if self.state.phase != Phase::Complete {
            return None;
        }
        let answers = self
            .state
            .answers
            .iter()
            .map(|record| {
                let prompt = self
                    .challenge
                    .page(record.page_index)
                    .and_then(|p| p.questions.get(record.question_index))
                    .map(|q| q.prompt.clone())
                    .unwrap_or_default();
                AnswerEntry {
                    id: Some(record.question_id.clone()),
                    question: prompt,
                    selected: record.selected.clone(),
                    kind: AnswerKind::Quiz,
                }
            })
            .collect();
        Some(ReportPayload { answers })
    }

    /// Transcript of the finished run; `Some` only once complete.
    pub fn completion_record(&self) -> Option<CompletionRecord> {
        let summary = self.summary()?;
        Some(CompletionRecord::new(summary, self.state.answers.clone()))
    }

    /// Hand the finished run to `reporter`.
    ///
    /// Borrows the engine immutably, so no transition can run while the
    /// request is pending. Failure leaves the session untouched.
    #[instrument(skip_all, fields(reporter = reporter.name()))]
    pub async fn submit(&self, reporter: &dyn ResultReporter) -> Result<Navigation, ReportError> {
        let payload = self.report_payload().ok_or(ReportError::Incomplete)?;
        debug!(answers = payload.len(), "submitting results");
        reporter.report(&payload).await
    }
}

/// Drive `engine` with `presenter` until the user navigates away.
///
/// On entry to [`Phase::Complete`] the results are handed to `reporter`, if
/// one is given. A successful report is an external navigation and ends the
/// session; a failed one is shown to the presenter and the loop continues
/// from the completion screen.
pub async fn run_session(
    engine: &mut ChallengeEngine,
    presenter: &mut dyn Presenter,
    reporter: Option<&dyn ResultReporter>,
) -> Option<Navigation> {
    let mut render = engine.render();
    let mut entered_complete = false;
    loop {
        presenter.present(&render);

        if entered_complete {
            if let Some(reporter) = reporter {
                match engine.submit(reporter).await {
                    Ok(navigation) => {
                        presenter.navigate(&navigation);
                        return Some(navigation);
                    }
                    Err(e) => {
                        tracing::warn!("report failed: {e}");
                        presenter.report_failed(&e);
                    }
                }
            }
        }

        let event = presenter.next_event()?;
        let before = engine.phase();
        render = engine.apply(event);
        entered_complete = before != Phase::Complete && render.phase == Phase::Complete;
    }
}
