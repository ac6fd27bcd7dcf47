// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow definitions: the step graph an [`crate::execution::Execution`] walks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WorkflowValidationError;
use crate::ids::{OrganizationId, WorkflowId};

/// A versioned, named definition of a step graph bound to a trigger.
///
/// Uniqueness is `(organization_id, workflow_key, version)`; a new version
/// of the same `workflow_key` is a distinct, immutable row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub organization_id: OrganizationId,
    pub workflow_key: String,
    pub version: String,
    pub name: String,
    pub enabled: bool,
    pub trigger: Trigger,
    pub context_load: Vec<String>,
    pub steps: Vec<Step>,
}

impl Workflow {
    /// The entry point for a fresh execution: `steps[0]`, or `None` if the
    /// workflow somehow has no steps (validation should have rejected that).
    pub fn first_step_id(&self) -> Option<&str> {
        self.steps.first().map(|s| s.id.as_str())
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Structural validation: step ids are unique, branch targets resolve,
    /// and reserved step types are rejected (see the Open Questions in
    /// `SPEC_FULL.md` §9 — `parallel`/`foreach` have no execution semantics
    /// defined, so workflows using them are rejected outright).
    pub fn validate(&self) -> Result<(), WorkflowValidationError> {
        if self.steps.is_empty() {
            return Err(WorkflowValidationError::NoSteps);
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(WorkflowValidationError::DuplicateStepId(step.id.clone()));
            }
            if matches!(step.kind, StepKind::Parallel | StepKind::Foreach) {
                return Err(WorkflowValidationError::ReservedStepType(
                    step.kind.label().to_string(),
                ));
            }
        }

        let ids: HashSet<&str> = self.steps.iter().map(|s| s.id.as_str()).collect();
        let check = |step: &str, target: &Option<String>| -> Result<(), WorkflowValidationError> {
            if let Some(target) = target {
                if !ids.contains(target.as_str()) {
                    return Err(WorkflowValidationError::UnknownStepReference {
                        step: step.to_string(),
                        target: target.clone(),
                    });
                }
            }
            Ok(())
        };

        for step in &self.steps {
            match &step.kind {
                StepKind::Condition { condition, on_true, on_false } => {
                    condition.validate().map_err(|source| WorkflowValidationError::Condition {
                        step: step.id.clone(),
                        source,
                    })?;
                    check(&step.id, on_true)?;
                    check(&step.id, on_false)?;
                }
                StepKind::Action { next, .. } => check(&step.id, next)?,
                StepKind::Execute { next, .. } => check(&step.id, next)?,
                StepKind::Wait { next, on_timeout, .. } => {
                    check(&step.id, next)?;
                    check(&step.id, on_timeout)?;
                }
                StepKind::Parallel | StepKind::Foreach => unreachable!("rejected above"),
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Event,
    Schedule,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

/// One node in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(flatten)]
    pub kind: StepKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    Condition {
        condition: Condition,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_true: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_false: Option<String>,
    },
    Action {
        action: ActionDecision,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        next: Option<String>,
    },
    Execute {
        execute: Vec<ActionSpec>,
        #[serde(skip_serializing_if = "Option::is_none")]
        next: Option<String>,
    },
    Wait {
        #[serde(flatten)]
        wait: WaitSpec,
        #[serde(skip_serializing_if = "Option::is_none")]
        next: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_timeout: Option<String>,
    },
    /// Reserved: no execution semantics defined. `Workflow::validate` rejects
    /// any workflow that uses it.
    Parallel,
    /// Reserved, same as `Parallel`.
    Foreach,
}

impl StepKind {
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Condition { .. } => "condition",
            StepKind::Action { .. } => "action",
            StepKind::Execute { .. } => "execute",
            StepKind::Wait { .. } => "wait",
            StepKind::Parallel => "parallel",
            StepKind::Foreach => "foreach",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionDecision {
    Allow,
    Block,
    RequireApproval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaitSpec {
    ForEvent {
        for_event: String,
    },
    Duration {
        #[serde(with = "crate::duration_serde")]
        duration: std::time::Duration,
    },
}

/// One externally-dispatched action inside an `execute` step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionSpec {
    Notify {
        recipients: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        template: Option<String>,
        #[serde(default)]
        params: serde_json::Map<String, Value>,
    },
    Webhook {
        url: String,
        #[serde(default)]
        body: serde_json::Map<String, Value>,
    },
    HttpRequest {
        url: String,
        #[serde(default = "default_method")]
        method: String,
        #[serde(default)]
        body: serde_json::Map<String, Value>,
    },
    CreateRecord {
        entity_type: String,
        #[serde(default)]
        fields: serde_json::Map<String, Value>,
    },
    UpdateRecord {
        entity_type: String,
        entity_id: String,
        #[serde(default)]
        fields: serde_json::Map<String, Value>,
    },
    CreateApprovalRequest {
        entity_type: String,
        entity_id: String,
        approver_role: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        expires_in_s: Option<u64>,
    },
    Log {
        message: String,
    },
}

impl ActionSpec {
    pub fn name(&self) -> &'static str {
        match self {
            ActionSpec::Notify { .. } => "notify",
            ActionSpec::Webhook { .. } => "webhook",
            ActionSpec::HttpRequest { .. } => "http_request",
            ActionSpec::CreateRecord { .. } => "create_record",
            ActionSpec::UpdateRecord { .. } => "update_record",
            ActionSpec::CreateApprovalRequest { .. } => "create_approval_request",
            ActionSpec::Log { .. } => "log",
        }
    }
}

fn default_method() -> String {
    "POST".to_string()
}

/// The condition expression tree evaluated by [`crate::evaluator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Leaf(ConditionLeaf),
    Compound(ConditionCompound),
}

impl Condition {
    fn validate(&self) -> Result<(), crate::error::EvalError> {
        match self {
            Condition::Leaf(leaf) => {
                if leaf.field.is_empty() {
                    return Err(crate::error::EvalError::MissingField);
                }
                Ok(())
            }
            Condition::Compound(compound) => {
                if compound.conditions.is_empty() {
                    return Err(crate::error::EvalError::EmptyCompound);
                }
                if compound.logical_op == LogicalOp::Not && compound.conditions.len() != 1 {
                    return Err(crate::error::EvalError::NotArity(compound.conditions.len()));
                }
                for child in &compound.conditions {
                    child.validate()?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionLeaf {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionCompound {
    pub logical_op: LogicalOp,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
    Regex,
    Before,
    After,
    Between,
    WithinLast,
    OlderThan,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct WorkflowBuilder => Workflow {
        computed { id: WorkflowId = WorkflowId::new() }
        computed { organization_id: OrganizationId = OrganizationId::new() }
        into { workflow_key: String = "wf-test" }
        into { version: String = "1" }
        into { name: String = "test workflow" }
        set { enabled: bool = true }
        computed { trigger: Trigger = Trigger { trigger_type: TriggerType::Event, event_type: Some("order.created".to_string()) } }
        computed { context_load: Vec<String> = Vec::new() }
        computed { steps: Vec<Step> = Vec::new() }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl WorkflowBuilder {
    pub fn steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.trigger = Trigger { trigger_type: TriggerType::Event, event_type: Some(event_type.into()) };
        self
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
