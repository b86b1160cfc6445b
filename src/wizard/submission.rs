//! Contract between the wizard and the caller-supplied finish handler.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::timeout;

use super::field::{FieldErrors, FormData};
use crate::errors::PanelError;

pub const FALLBACK_SERVER_MESSAGE: &str = "Something went wrong while saving, try again";

/// Why the wizard was opened; forwarded to the finish handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    #[default]
    Create,
    Edit,
}

/// What the finish handler reports back when it completes normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    /// The backend refused specific fields.
    Rejected(FieldErrors),
}

#[derive(Debug, Error)]
pub enum FinishError {
    #[error("{0}")]
    Message(String),
    #[error("The server took longer than {}s to answer", .0.as_secs())]
    TimedOut(Duration),
    #[error(transparent)]
    Panel(#[from] PanelError),
}

impl FinishError {
    /// Text shown in the wizard banner.
    pub fn banner_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_SERVER_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Final status of a [`submit`](super::WizardEngine::submit) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Local validation failed; the handler was not called.
    Invalid,
    /// Another submission is still pending; nothing was sent.
    InFlight,
    /// The handler succeeded and the wizard closed.
    Completed,
    /// The handler returned field errors.
    Rejected,
    /// The handler failed; `server_error_message` is set.
    Failed,
}

/// Caller-supplied persistence step run once every field validates.
#[async_trait]
pub trait FinishHandler: Send + Sync {
    async fn finish(
        &self,
        purpose: Purpose,
        data: &FormData,
    ) -> Result<SubmitOutcome, FinishError>;
}

/// Snapshot handed out by [`begin_submit`](super::WizardEngine::begin_submit).
///
/// Owns everything the handler call needs, so the engine stays readable
/// (and `is_submitting` observable) while [`run`](Self::run) is awaited.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmit {
    pub purpose: Purpose,
    pub data: FormData,
    pub deadline: Option<Duration>,
}

impl PendingSubmit {
    /// Calls `handler`, bounded by the deadline when one is set.
    pub async fn run(&self, handler: &dyn FinishHandler) -> Result<SubmitOutcome, FinishError> {
        match self.deadline {
            Some(limit) => timeout(limit, handler.finish(self.purpose, &self.data))
                .await
                .unwrap_or_else(|_| Err(FinishError::TimedOut(limit))),
            None => handler.finish(self.purpose, &self.data).await,
        }
    }
}

/// Adapts an async closure into a [`FinishHandler`].
pub struct FinishFn<F>(pub F);

/// Wraps `finish` so closure argument types are inferred at the call site.
pub fn finish_fn<F, Fut>(finish: F) -> FinishFn<F>
where
    F: Fn(Purpose, FormData) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<SubmitOutcome, FinishError>> + Send + 'static,
{
    FinishFn(finish)
}

#[async_trait]
impl<F, Fut> FinishHandler for FinishFn<F>
where
    F: Fn(Purpose, FormData) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<SubmitOutcome, FinishError>> + Send + 'static,
{
    async fn finish(
        &self,
        purpose: Purpose,
        data: &FormData,
    ) -> Result<SubmitOutcome, FinishError> {
        (self.0)(purpose, data.clone()).await
    }
}
