use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tradeflow_config::ApprovalRole;
use tradeflow_workflow::{ApprovalStep, Catalog, WorkflowDefinition};

use crate::types::{ApprovalRequest, ProcessWorkflow};

/// Reference from the pending queue into a process history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingEntry {
  pub(crate) request_id: String,
  pub(crate) process_id: String,
}

/// Owner of all approval workflow state.
///
/// A pending request is stored once, inside its process history; the queue
/// only holds references to it, so queue and history always agree.
#[derive(Debug, Clone, Default)]
pub struct WorkflowStore {
  pub(crate) catalog: Catalog,
  pub(crate) processes: BTreeMap<String, ProcessWorkflow>,
  pub(crate) pending: Vec<PendingEntry>,
}

/// Serializable view of the runtime state, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
  pub process_workflows: Vec<ProcessWorkflow>,
  /// Pending request ids in queue order.
  pub pending_request_ids: Vec<String>,
}

impl WorkflowStore {
  /// Create an empty store over a catalog of workflow templates.
  pub fn new(catalog: Catalog) -> Self {
    Self {
      catalog,
      processes: BTreeMap::new(),
      pending: Vec::new(),
    }
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  /// All process workflows, ordered by process id.
  pub fn process_workflows(&self) -> impl Iterator<Item = &ProcessWorkflow> {
    self.processes.values()
  }

  /// Pending requests in the order they were raised.
  pub fn pending_approvals(&self) -> impl Iterator<Item = &ApprovalRequest> {
    self
      .pending
      .iter()
      .filter_map(|entry| self.lookup(&entry.process_id, &entry.request_id))
  }

  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  /// A request that is still awaiting a decision.
  pub fn get_pending_request(&self, request_id: &str) -> Option<&ApprovalRequest> {
    let entry = self.pending.iter().find(|e| e.request_id == request_id)?;
    self.lookup(&entry.process_id, &entry.request_id)
  }

  pub fn get_workflow_by_id(&self, workflow_id: &str) -> Option<&WorkflowDefinition> {
    self.catalog.get(workflow_id)
  }

  pub fn get_workflow_for_process(&self, process_id: &str) -> Option<&ProcessWorkflow> {
    self.processes.get(process_id)
  }

  pub fn get_step_by_id(&self, workflow_id: &str, step_id: &str) -> Option<&ApprovalStep> {
    self.get_workflow_by_id(workflow_id)?.get_step(step_id)
  }

  /// The step the process is currently sitting at.
  pub fn get_current_step(&self, process_id: &str) -> Option<&ApprovalStep> {
    let process = self.get_workflow_for_process(process_id)?;
    self.get_step_by_id(&process.workflow_id, &process.current_step_id)
  }

  /// The step after the current one; none when the current step is terminal.
  pub fn get_next_step(&self, process_id: &str) -> Option<&ApprovalStep> {
    let process = self.get_workflow_for_process(process_id)?;
    self
      .get_workflow_by_id(&process.workflow_id)?
      .next_step(&process.current_step_id)
  }

  /// Full request history of a process; empty for unknown processes.
  pub fn get_approval_history(&self, process_id: &str) -> &[ApprovalRequest] {
    self
      .get_workflow_for_process(process_id)
      .map(|process| process.approval_history.as_slice())
      .unwrap_or(&[])
  }

  /// Pending requests whose step must be decided by `role`.
  ///
  /// The step is resolved through the request's process workflow template
  /// and the request's own step id.
  pub fn get_pending_approvals_for_role(&self, role: ApprovalRole) -> Vec<&ApprovalRequest> {
    self
      .pending_approvals()
      .filter(|request| {
        self
          .get_workflow_for_process(&request.process_id)
          .and_then(|process| self.get_step_by_id(&process.workflow_id, &request.step_id))
          .is_some_and(|step| step.required_role == role)
      })
      .collect()
  }

  pub fn snapshot(&self) -> StoreSnapshot {
    StoreSnapshot {
      process_workflows: self.processes.values().cloned().collect(),
      pending_request_ids: self.pending.iter().map(|e| e.request_id.clone()).collect(),
    }
  }

  fn lookup(&self, process_id: &str, request_id: &str) -> Option<&ApprovalRequest> {
    self
      .processes
      .get(process_id)?
      .approval_history
      .iter()
      .find(|r| r.id == request_id)
  }
}
