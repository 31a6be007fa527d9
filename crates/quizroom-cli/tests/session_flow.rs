//! End-to-end session tests: sample bank -> engine -> HTTP reporter.
//!
//! These drive `run_session` with a scripted presenter against a mock
//! results endpoint, the same path `quizroom play --report` takes.

use std::path::Path;

use quizroom_core::engine::{run_session, ChallengeEngine, Event, Presenter, Render};
use quizroom_core::error::ReportError;
use quizroom_core::parser;
use quizroom_core::report::{CompletionRecord, Navigation};
use quizroom_core::session::Phase;
use quizroom_reporter::{HttpReporter, ReporterConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Script {
    events: Vec<Event>,
    phases: Vec<Phase>,
    navigated: Option<String>,
    failures: Vec<ReportError>,
}

impl Script {
    fn new(events: Vec<Event>) -> Self {
        let mut events = events;
        events.reverse();
        Self {
            events,
            ..Default::default()
        }
    }
}

impl Presenter for Script {
    fn present(&mut self, render: &Render) {
        self.phases.push(render.phase);
    }

    fn next_event(&mut self) -> Option<Event> {
        self.events.pop()
    }

    fn navigate(&mut self, navigation: &Navigation) {
        self.navigated = Some(navigation.redirect_url.clone());
    }

    fn report_failed(&mut self, error: &ReportError) {
        self.failures.push(error.clone());
    }
}

fn sample_engine() -> ChallengeEngine {
    let challenge = parser::load_challenge(Path::new("../../banks/dbp-challenge")).unwrap();
    ChallengeEngine::new(challenge)
}

fn select(option: &str) -> Event {
    Event::SelectOption(option.into())
}

fn perfect_events() -> Vec<Event> {
    vec![
        Event::Start,
        Event::BeginSection,
        select("Chlorine"),
        Event::Next,
        select("Natural organic matter"),
        Event::Next,
        Event::ContinueSection,
        Event::BeginSection,
        select("Enhanced coagulation"),
        Event::Next,
        select("UV light"),
        Event::Next,
        Event::ContinueSection,
    ]
}

fn reporter(server: &MockServer) -> HttpReporter {
    let mut config = ReporterConfig::new(server.uri());
    config.timeout_secs = 5;
    HttpReporter::from_config(&config).unwrap()
}

#[tokio::test]
async fn e2e_perfect_run_is_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/action_reaction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "redirect_url": "/register"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = sample_engine();
    let mut presenter = Script::new(perfect_events());
    let reporter = reporter(&server);

    let nav = run_session(&mut engine, &mut presenter, Some(&reporter)).await;

    assert_eq!(nav.map(|n| n.redirect_url).as_deref(), Some("/register"));
    assert_eq!(presenter.navigated.as_deref(), Some("/register"));
    assert_eq!(presenter.phases.first(), Some(&Phase::Welcome));
    assert_eq!(presenter.phases.last(), Some(&Phase::Complete));
    assert_eq!(engine.summary().unwrap().percentage, 100);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let selected: Vec<_> = body["answers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["selected"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        selected,
        ["Chlorine", "Natural organic matter", "Enhanced coagulation", "UV light"]
    );
}

#[tokio::test]
async fn e2e_failed_report_keeps_completion_screen() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = sample_engine();
    let mut presenter = Script::new(perfect_events());
    let reporter = reporter(&server);

    let nav = run_session(&mut engine, &mut presenter, Some(&reporter)).await;

    assert!(nav.is_none());
    assert_eq!(
        presenter.failures,
        vec![ReportError::Http {
            status: 503,
            message: "maintenance".into()
        }]
    );
    assert!(presenter.failures[0].is_server_side());
    // Still complete, answers intact, so a retry could resubmit the same payload.
    assert_eq!(engine.phase(), Phase::Complete);
    assert_eq!(engine.report_payload().unwrap().len(), 4);
}

#[tokio::test]
async fn e2e_retry_after_failure_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "redirect_url": "/register"
        })))
        .mount(&server)
        .await;

    let mut engine = sample_engine();
    let mut presenter = Script::new(perfect_events());
    let reporter = reporter(&server);

    assert!(run_session(&mut engine, &mut presenter, Some(&reporter))
        .await
        .is_none());

    let nav = engine.submit(&reporter).await.unwrap();
    assert_eq!(nav.redirect_url, "/register");
}

#[tokio::test]
async fn e2e_completion_record_survives_disk() {
    let mut engine = sample_engine();
    let mut presenter = Script::new(perfect_events());
    run_session(&mut engine, &mut presenter, None).await;

    let record = engine.completion_record().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    record.save_json(&path).unwrap();

    let loaded = CompletionRecord::load_json(&path).unwrap();
    assert_eq!(loaded.id, record.id);
    assert_eq!(loaded.summary, record.summary);
    assert_eq!(loaded.answers.len(), 4);
}

#[tokio::test]
async fn e2e_restart_after_completion_starts_clean() {
    let mut events = perfect_events();
    events.push(Event::Restart);
    let mut engine = sample_engine();
    let mut presenter = Script::new(events);

    assert!(run_session(&mut engine, &mut presenter, None).await.is_none());
    assert_eq!(engine.phase(), Phase::Welcome);
    assert_eq!(engine.state().total_score(), 0);
    assert!(engine.report_payload().is_none());
}
