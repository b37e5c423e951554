use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tradeflow_config::ApprovalRole;

/// Status of a process workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
  Active,
  Completed,
}

/// Status of an approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
  Pending,
  Approved,
  Rejected,
}

/// A request for a decision on one step of a process workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
  pub id: String,
  pub process_id: String,
  pub step_id: String,
  pub requester_id: String,
  pub requester_role: ApprovalRole,
  pub request_date: DateTime<Utc>,
  pub status: ApprovalStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comments: Option<String>,
  /// Set once a decision is recorded.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub responder_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub response_date: Option<DateTime<Utc>>,
}

impl ApprovalRequest {
  pub fn is_pending(&self) -> bool {
    self.status == ApprovalStatus::Pending
  }

  /// Time between request and decision, for decided requests.
  pub fn response_time(&self) -> Option<chrono::Duration> {
    self.response_date.map(|decided| decided - self.request_date)
  }
}

/// The live binding between a business process and a workflow template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessWorkflow {
  pub process_id: String,
  pub workflow_id: String,
  pub current_step_id: String,
  pub status: WorkflowStatus,
  /// Every request raised for this process, oldest first.
  pub approval_history: Vec<ApprovalRequest>,
}

impl ProcessWorkflow {
  pub fn is_active(&self) -> bool {
    self.status == WorkflowStatus::Active
  }

  pub(crate) fn request_mut(&mut self, request_id: &str) -> Option<&mut ApprovalRequest> {
    self.approval_history.iter_mut().find(|r| r.id == request_id)
  }
}
