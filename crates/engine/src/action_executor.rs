// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatches one `ActionSpec` to the adapter sink its `type` names.
//!
//! One attempt per call. The executor never retries; a sink that wants
//! retries implements them internally (§7 of the design notes).

use serde_json::Value;
use wfe_adapters::{HttpSink, NotificationSink, RecordSink};
use wfe_core::ActionSpec;

use crate::error::ActionError;
use crate::template::{substitute_map, substitute_str};

/// What dispatching an action produced, for the StepExecution output column.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutput {
    Notified,
    HttpResponse(Value),
    RecordCreated { entity_id: String },
    RecordUpdated,
    /// Signals the interpreter to hand off to the ApprovalCoordinator
    /// instead of treating this as a completed action.
    ApprovalRequested,
    Logged,
}

pub struct ActionExecutor<N, R, H> {
    notifications: N,
    records: R,
    http: H,
}

impl<N, R, H> ActionExecutor<N, R, H>
where
    N: NotificationSink,
    R: RecordSink,
    H: HttpSink,
{
    pub fn new(notifications: N, records: R, http: H) -> Self {
        Self { notifications, records, http }
    }

    pub async fn execute(&self, action: &ActionSpec, ctx: &Value) -> Result<ActionOutput, ActionError> {
        match action {
            ActionSpec::Notify { recipients, template, params } => {
                let body = match template {
                    Some(template) => substitute_str(template, ctx)?,
                    None => Value::Object(substitute_map(params, ctx)?).to_string(),
                };
                self.notifications.send(recipients, "workflow notification", &body).await?;
                Ok(ActionOutput::Notified)
            }
            ActionSpec::Webhook { url, body } => {
                let url = substitute_str(url, ctx)?;
                let body = substitute_map(body, ctx)?;
                let response = self.http.call("POST", &url, &body).await?;
                Ok(ActionOutput::HttpResponse(response))
            }
            ActionSpec::HttpRequest { url, method, body } => {
                let url = substitute_str(url, ctx)?;
                let body = substitute_map(body, ctx)?;
                let response = self.http.call(method, &url, &body).await?;
                Ok(ActionOutput::HttpResponse(response))
            }
            ActionSpec::CreateRecord { entity_type, fields } => {
                let fields = substitute_map(fields, ctx)?;
                let entity_id = self.records.create_record(entity_type, &fields).await?;
                Ok(ActionOutput::RecordCreated { entity_id })
            }
            ActionSpec::UpdateRecord { entity_type, entity_id, fields } => {
                let entity_id = substitute_str(entity_id, ctx)?;
                let fields = substitute_map(fields, ctx)?;
                self.records.update_record(entity_type, &entity_id, &fields).await?;
                Ok(ActionOutput::RecordUpdated)
            }
            ActionSpec::CreateApprovalRequest { .. } => Ok(ActionOutput::ApprovalRequested),
            ActionSpec::Log { message } => {
                let message = substitute_str(message, ctx)?;
                tracing::info!(%message, "workflow log action");
                Ok(ActionOutput::Logged)
            }
        }
    }
}

#[cfg(test)]
#[path = "action_executor_tests.rs"]
mod tests;
