//! Collaborator traits.
//!
//! The HTTP implementation of [`ResultReporter`] lives in `quizroom-reporter`.

use async_trait::async_trait;

use crate::error::ReportError;
use crate::report::{Navigation, ReportPayload};

/// Delivers a finished run's answers to a remote endpoint.
///
/// A single attempt is made per call. Failures are returned to the caller
/// for display and never affect in-memory progress.
#[async_trait]
pub trait ResultReporter: Send + Sync {
    /// Human-readable reporter name (e.g. "http").
    fn name(&self) -> &str;

    /// Send the payload and return the navigation instruction on success.
    async fn report(&self, payload: &ReportPayload) -> Result<Navigation, ReportError>;
}
