//! Backend contract consumed by the entity views: the request collaborator,
//! response interpretation and the shared finish handler.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::PanelConfig;
use crate::entities::EntityKind;
use crate::errors::{PanelError, Result};
use crate::session::Session;
use crate::wizard::{FieldErrors, FinishError, FinishHandler, FormData, Purpose, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// Envelope every backend endpoint answers with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Transport used to reach the backend. Errors are reserved for failures
/// where no envelope came back at all.
#[async_trait]
pub trait RequestClient: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(String, String)],
    ) -> Result<ApiResponse>;
}

/// Extracts per-field messages from a backend error payload.
///
/// Accepts `{"field": "message"}` and `{"field": ["message", ...]}`; only the
/// first message of a list is kept. Anything else yields no field errors.
pub fn field_errors(error: &Value) -> FieldErrors {
    let Some(fields) = error.as_object() else {
        return FieldErrors::new();
    };
    fields
        .iter()
        .filter_map(|(field, messages)| {
            let message = match messages {
                Value::String(message) => Some(message.clone()),
                Value::Array(list) => list
                    .iter()
                    .find_map(|item| item.as_str().map(str::to_string)),
                _ => None,
            }?;
            Some((field.clone(), message))
        })
        .collect()
}

/// Maps an envelope onto what the wizard understands.
pub fn interpret(response: ApiResponse) -> std::result::Result<SubmitOutcome, FinishError> {
    if response.success {
        return Ok(SubmitOutcome::Success);
    }
    let errors = response.error.as_ref().map(field_errors).unwrap_or_default();
    if !errors.is_empty() {
        return Ok(SubmitOutcome::Rejected(errors));
    }
    let message = response
        .message
        .or_else(|| response.error.and_then(|error| error.as_str().map(str::to_string)))
        .unwrap_or_default();
    Err(FinishError::Message(message))
}

pub fn form_data_to_json(data: &FormData) -> Result<Value> {
    Ok(serde_json::to_value(data)?)
}

/// Finish handler shared by every entity view: creates or updates one record
/// of `kind` on behalf of `session`.
pub struct EntityFinishHandler<C> {
    client: C,
    session: Session,
    kind: EntityKind,
    record_id: Option<String>,
    config: PanelConfig,
}

impl<C: RequestClient> EntityFinishHandler<C> {
    pub fn new(client: C, session: Session, kind: EntityKind, config: PanelConfig) -> Self {
        Self {
            client,
            session,
            kind,
            record_id: None,
            config,
        }
    }

    /// Targets an existing record, required when editing.
    pub fn for_record(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn target(&self, purpose: Purpose) -> Result<(Method, String)> {
        let endpoint = self.kind.endpoint();
        match purpose {
            Purpose::Create => Ok((
                Method::Post,
                self.config.endpoint_url(&format!("{}/", endpoint)),
            )),
            Purpose::Edit => {
                let id = self.record_id.as_deref().ok_or_else(|| {
                    PanelError::Request(format!("editing {} requires a record id", self.kind))
                })?;
                Ok((
                    Method::Put,
                    self.config.endpoint_url(&format!("{}/{}/", endpoint, id)),
                ))
            }
        }
    }
}

#[async_trait]
impl<C: RequestClient> FinishHandler for EntityFinishHandler<C> {
    async fn finish(
        &self,
        purpose: Purpose,
        data: &FormData,
    ) -> std::result::Result<SubmitOutcome, FinishError> {
        self.session.authorize(self.kind, Utc::now())?;
        let (method, path) = self.target(purpose)?;
        let body = form_data_to_json(data)?;
        let headers = [self.session.authorization_header()];

        debug!(%method, %path, "dispatching record");
        let response = self.client.request(method, &path, Some(body), &headers).await?;
        let outcome = interpret(response);
        match &outcome {
            Ok(SubmitOutcome::Success) => info!(kind = %self.kind, ?purpose, "record saved"),
            Ok(SubmitOutcome::Rejected(errors)) => {
                debug!(kind = %self.kind, fields = errors.len(), "record rejected")
            }
            Err(err) => warn!(kind = %self.kind, error = %err, "record not saved"),
        }
        outcome
    }
}
