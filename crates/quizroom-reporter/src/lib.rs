//! quizroom-reporter: Result delivery for quizroom.
//!
//! Implements the `ResultReporter` trait over HTTP, and loads the
//! configuration that says where results go.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{load_config_from, QuizroomConfig, ReporterConfig};
pub use http::HttpReporter;
pub use mock::MockReporter;
pub use quizroom_core::error::ReportError;
