//! State transitions.
//!
//! Every action validates all of its preconditions before the first write, so
//! an `Err` always means the store was left untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tradeflow_config::ApprovalRole;

use crate::error::ActionError;
use crate::store::{PendingEntry, WorkflowStore};
use crate::types::{ApprovalRequest, ApprovalStatus, ProcessWorkflow, WorkflowStatus};

/// A process was bound to a workflow template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Started {
  pub process_id: String,
  pub workflow_id: String,
  pub workflow_name: String,
  pub initial_step_id: String,
}

/// A pending request was raised for the current step of a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestCreated {
  pub request_id: String,
  pub process_id: String,
  pub step_id: String,
}

/// What an approval did to the owning process workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
  /// The process moved on to the next step.
  Advanced { next_step_id: String },
  /// The approved step was terminal; the workflow is complete.
  Completed,
  /// The request's step is no longer the active current step, so the
  /// decision is recorded without moving the process.
  Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approved {
  pub request_id: String,
  pub process_id: String,
  pub step_id: String,
  pub transition: Transition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejected {
  pub request_id: String,
  pub process_id: String,
  pub step_id: String,
}

impl WorkflowStore {
  /// Bind `process_id` to a new instance of `workflow_id` at its initial step.
  pub fn start_workflow(
    &mut self,
    process_id: &str,
    workflow_id: &str,
  ) -> Result<Started, ActionError> {
    if self.processes.contains_key(process_id) {
      return Err(ActionError::WorkflowAlreadyExists {
        process_id: process_id.to_string(),
      });
    }

    let definition =
      self
        .catalog
        .get(workflow_id)
        .ok_or_else(|| ActionError::UnknownWorkflow {
          workflow_id: workflow_id.to_string(),
        })?;

    let started = Started {
      process_id: process_id.to_string(),
      workflow_id: workflow_id.to_string(),
      workflow_name: definition.name().to_string(),
      initial_step_id: definition.initial_step_id().to_string(),
    };

    self.processes.insert(
      process_id.to_string(),
      ProcessWorkflow {
        process_id: process_id.to_string(),
        workflow_id: workflow_id.to_string(),
        current_step_id: started.initial_step_id.clone(),
        status: WorkflowStatus::Active,
        approval_history: Vec::new(),
      },
    );

    Ok(started)
  }

  /// Raise a pending request for the process's current step.
  ///
  /// The requester role is recorded but not checked against the step's
  /// required role; only the decision side is role filtered.
  pub fn create_approval_request(
    &mut self,
    process_id: &str,
    requester_id: &str,
    requester_role: ApprovalRole,
    comments: Option<String>,
    now: DateTime<Utc>,
  ) -> Result<RequestCreated, ActionError> {
    let process =
      self
        .processes
        .get(process_id)
        .ok_or_else(|| ActionError::NoWorkflowForProcess {
          process_id: process_id.to_string(),
        })?;
    if !process.is_active() {
      return Err(ActionError::WorkflowNotActive {
        process_id: process_id.to_string(),
      });
    }

    let definition = self.catalog.get(&process.workflow_id).ok_or_else(|| {
      ActionError::WorkflowDefinitionMissing {
        process_id: process_id.to_string(),
        workflow_id: process.workflow_id.clone(),
      }
    })?;

    let step = definition
      .get_step(&process.current_step_id)
      .ok_or_else(|| ActionError::CurrentStepMissing {
        process_id: process_id.to_string(),
      })?;

    let request = ApprovalRequest {
      id: format!("req-{}", uuid::Uuid::new_v4()),
      process_id: process_id.to_string(),
      step_id: step.id.clone(),
      requester_id: requester_id.to_string(),
      requester_role,
      request_date: now,
      status: ApprovalStatus::Pending,
      comments,
      responder_id: None,
      response_date: None,
    };

    let created = RequestCreated {
      request_id: request.id.clone(),
      process_id: request.process_id.clone(),
      step_id: request.step_id.clone(),
    };

    self.pending.push(PendingEntry {
      request_id: request.id.clone(),
      process_id: request.process_id.clone(),
    });
    if let Some(process) = self.processes.get_mut(process_id) {
      process.approval_history.push(request);
    }

    Ok(created)
  }

  /// Approve a pending request and move its process along.
  ///
  /// Approving the current step of an active process advances it to the
  /// step's successor, or completes the workflow when the step is terminal.
  pub fn approve_request(
    &mut self,
    request_id: &str,
    responder_id: &str,
    comments: Option<String>,
    now: DateTime<Utc>,
  ) -> Result<Approved, ActionError> {
    let (process_id, step_id) = self.pending_target(request_id)?;
    let transition = self.transition_for(&process_id, &step_id);

    self.decide(
      request_id,
      &process_id,
      ApprovalStatus::Approved,
      responder_id,
      comments,
      now,
    );

    if let Some(process) = self.processes.get_mut(&process_id) {
      match &transition {
        Transition::Advanced { next_step_id } => process.current_step_id = next_step_id.clone(),
        Transition::Completed => process.status = WorkflowStatus::Completed,
        Transition::Unchanged => {}
      }
    }

    Ok(Approved {
      request_id: request_id.to_string(),
      process_id,
      step_id,
      transition,
    })
  }

  /// Reject a pending request. The process stays at its current step and a
  /// new request may be raised for it.
  pub fn reject_request(
    &mut self,
    request_id: &str,
    responder_id: &str,
    comments: Option<String>,
    now: DateTime<Utc>,
  ) -> Result<Rejected, ActionError> {
    let (process_id, step_id) = self.pending_target(request_id)?;

    self.decide(
      request_id,
      &process_id,
      ApprovalStatus::Rejected,
      responder_id,
      comments,
      now,
    );

    Ok(Rejected {
      request_id: request_id.to_string(),
      process_id,
      step_id,
    })
  }

  /// Process and step of a pending request.
  fn pending_target(&self, request_id: &str) -> Result<(String, String), ActionError> {
    self
      .get_pending_request(request_id)
      .map(|request| (request.process_id.clone(), request.step_id.clone()))
      .ok_or_else(|| ActionError::RequestNotFound {
        request_id: request_id.to_string(),
      })
  }

  fn transition_for(&self, process_id: &str, step_id: &str) -> Transition {
    let Some(process) = self.processes.get(process_id) else {
      return Transition::Unchanged;
    };
    if !process.is_active() || process.current_step_id != step_id {
      return Transition::Unchanged;
    }

    match self.get_step_by_id(&process.workflow_id, step_id) {
      Some(step) => match &step.next_step_id {
        Some(next_step_id) => Transition::Advanced {
          next_step_id: next_step_id.clone(),
        },
        None => Transition::Completed,
      },
      None => Transition::Unchanged,
    }
  }

  /// Record a decision on the history entry and drop it from the queue.
  fn decide(
    &mut self,
    request_id: &str,
    process_id: &str,
    status: ApprovalStatus,
    responder_id: &str,
    comments: Option<String>,
    now: DateTime<Utc>,
  ) {
    self.pending.retain(|entry| entry.request_id != request_id);

    let Some(request) = self
      .processes
      .get_mut(process_id)
      .and_then(|process| process.request_mut(request_id))
    else {
      return;
    };

    request.status = status;
    request.responder_id = Some(responder_id.to_string());
    request.response_date = Some(now);
    if let Some(comments) = comments.filter(|c| !c.is_empty()) {
      request.comments = Some(comments);
    }
  }
}
