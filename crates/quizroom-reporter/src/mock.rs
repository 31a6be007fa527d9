//! Mock reporter for tests and dry runs.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizroom_core::error::ReportError;
use quizroom_core::report::{Navigation, ReportPayload};
use quizroom_core::traits::ResultReporter;

/// A reporter that records payloads and returns a fixed outcome.
pub struct MockReporter {
    outcome: Result<Navigation, ReportError>,
    call_count: AtomicU32,
    last_payload: Mutex<Option<ReportPayload>>,
}

impl MockReporter {
    /// Accept every report and redirect to `redirect_url`.
    pub fn succeeding(redirect_url: &str) -> Self {
        Self::with_outcome(Ok(Navigation {
            redirect_url: redirect_url.to_string(),
        }))
    }

    /// Fail every report with `error`.
    pub fn failing(error: ReportError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<Navigation, ReportError>) -> Self {
        Self {
            outcome,
            call_count: AtomicU32::new(0),
            last_payload: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_payload(&self) -> Option<ReportPayload> {
        self.last_payload.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultReporter for MockReporter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn report(&self, payload: &ReportPayload) -> Result<Navigation, ReportError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizroom_core::engine::{ChallengeEngine, Event};
    use quizroom_core::model::{Page, Question};

    fn finished_engine() -> ChallengeEngine {
        let question = Question::new("q1", "Pick A", vec!["A".into(), "B".into()], "A");
        let mut engine =
            ChallengeEngine::from_pages(vec![Page::new("p1", "Only room", vec![question])])
                .unwrap();
        for event in [
            Event::Start,
            Event::BeginSection,
            Event::SelectOption("B".into()),
            Event::Next,
            Event::ContinueSection,
        ] {
            engine.apply(event);
        }
        engine
    }

    #[tokio::test]
    async fn records_payload() {
        let mock = MockReporter::succeeding("/results");
        let engine = finished_engine();

        let nav = engine.submit(&mock).await.unwrap();
        assert_eq!(nav.redirect_url, "/results");
        assert_eq!(mock.call_count(), 1);
        let payload = mock.last_payload().unwrap();
        assert_eq!(payload.answers[0].selected, "B");
    }

    #[tokio::test]
    async fn failure_leaves_engine_complete() {
        let mock = MockReporter::failing(ReportError::Network("down".into()));
        let engine = finished_engine();
        let before = engine.state().clone();

        assert!(engine.submit(&mock).await.is_err());
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.summary().unwrap().percentage, 0);
    }
}
