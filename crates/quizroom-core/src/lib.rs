//! quizroom-core: Question bank, session state and the challenge state machine.
//!
//! This crate holds everything with assessment logic in it. Rendering and
//! result delivery are collaborators: presenters implement
//! [`engine::Presenter`], and `quizroom-reporter` implements
//! [`traits::ResultReporter`].

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod quiz;
pub mod report;
pub mod scoring;
pub mod session;
pub mod traits;

pub use engine::{ChallengeEngine, Event, Render, View};
pub use error::{ConfigError, ReportError};
pub use model::{Challenge, Page, Question};
pub use session::{Phase, SessionState};
