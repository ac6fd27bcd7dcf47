// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared "start one execution" logic used by both the EventRouter (event
//! triggers) and the Scheduler (cron triggers): create the execution row,
//! publish its creation, build the context, and hand it to the
//! interpreter. A context build failure marks the row failed rather than
//! leaving it without a trace.

use std::sync::Arc;

use serde_json::{json, Value};
use wfe_adapters::{HttpSink, MessageBus, NotificationSink, RecordSink};
use wfe_core::{Clock, Execution, ExecutionId, ExecutionStatus, Workflow};
use wfe_storage::ExecutionStore;

use crate::context::ContextBuilder;
use crate::error::EngineError;
use crate::interpreter::Interpreter;

pub(crate) struct ExecutionLauncher<N, R, H, C: Clock> {
    executions: Arc<dyn ExecutionStore>,
    context: ContextBuilder<C>,
    interpreter: Arc<Interpreter<N, R, H, C>>,
    bus: Arc<dyn MessageBus>,
    clock: C,
}

impl<N, R, H, C> ExecutionLauncher<N, R, H, C>
where
    N: NotificationSink,
    R: RecordSink,
    H: HttpSink,
    C: Clock,
{
    pub(crate) fn new(
        executions: Arc<dyn ExecutionStore>,
        context: ContextBuilder<C>,
        interpreter: Arc<Interpreter<N, R, H, C>>,
        bus: Arc<dyn MessageBus>,
        clock: C,
    ) -> Self {
        Self { executions, context, interpreter, bus, clock }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn launch(
        &self,
        workflow: &Workflow,
        execution_key: String,
        trigger_event: String,
        trigger_payload: Value,
        context_seed: &Value,
    ) -> Result<ExecutionId, EngineError> {
        let mut execution = Execution::new(
            workflow.organization_id,
            workflow.id,
            execution_key,
            trigger_event,
            trigger_payload,
            self.clock.epoch_ms(),
            None,
        );
        self.executions.create(execution.clone())?;
        let execution_id = execution.id;

        let _ = self
            .bus
            .publish(
                "executions",
                json!({
                    "type": "execution.created",
                    "execution_id": execution_id,
                    "organization_id": workflow.organization_id,
                    "workflow_id": workflow.id,
                    "status": "pending",
                }),
            )
            .await;

        let context = match self.context.build(context_seed, &workflow.context_load).await {
            Ok(context) => context,
            Err((source, cause)) => {
                let now_ms = self.clock.epoch_ms();
                execution.fail(format!("context build failed: {cause}"), now_ms);
                self.executions.update(workflow.organization_id, execution, Some(ExecutionStatus::Pending))?;
                let _ = self
                    .bus
                    .publish(
                        "executions",
                        json!({
                            "type": "execution.failed",
                            "execution_id": execution_id,
                            "organization_id": workflow.organization_id,
                            "workflow_id": workflow.id,
                            "status": "failed",
                        }),
                    )
                    .await;
                return Err(EngineError::Build { source, cause });
            }
        };
        execution.context = context;
        self.executions.update(workflow.organization_id, execution.clone(), Some(ExecutionStatus::Pending))?;

        self.interpreter.run(execution, workflow).await?;
        Ok(execution_id)
    }

    pub(crate) fn epoch_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }
}
