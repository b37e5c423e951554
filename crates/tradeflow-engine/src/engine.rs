//! Workflow engine.
//!
//! The `WorkflowEngine` owns a [`WorkflowStore`], runs actions against it and
//! turns each outcome into a [`WorkflowEvent`] for its notifier.

use chrono::Utc;
use tracing::{info, warn};
use tradeflow_config::ApprovalRole;
use tradeflow_store::{
  ActionError, Approved, Rejected, RequestCreated, Started, Transition, WorkflowStore,
};

use crate::events::{Action, NoopNotifier, Notifier, WorkflowEvent};

/// The approval workflow engine.
///
/// Generic over `N: Notifier` to allow different notification strategies.
/// Use `WorkflowEngine::new()` for an engine that discards events, or
/// `WorkflowEngine::with_notifier()` to observe them.
///
/// The `try_*` methods return the typed outcome; the plain methods report
/// success as a `bool`. Both emit the same event.
pub struct WorkflowEngine<N: Notifier = NoopNotifier> {
  store: WorkflowStore,
  notifier: N,
}

impl WorkflowEngine<NoopNotifier> {
  /// Create an engine with no-op notifications.
  pub fn new(store: WorkflowStore) -> Self {
    Self::with_notifier(store, NoopNotifier)
  }
}

impl<N: Notifier> WorkflowEngine<N> {
  /// Create an engine with a custom notifier.
  pub fn with_notifier(store: WorkflowStore, notifier: N) -> Self {
    Self { store, notifier }
  }

  /// Read access for queries.
  pub fn store(&self) -> &WorkflowStore {
    &self.store
  }

  pub fn start_workflow(&mut self, process_id: &str, workflow_id: &str) -> bool {
    self.try_start_workflow(process_id, workflow_id).is_ok()
  }

  pub fn create_approval_request(
    &mut self,
    process_id: &str,
    requester_id: &str,
    requester_role: ApprovalRole,
    comments: Option<String>,
  ) -> bool {
    self
      .try_create_approval_request(process_id, requester_id, requester_role, comments)
      .is_ok()
  }

  pub fn approve_request(
    &mut self,
    request_id: &str,
    responder_id: &str,
    comments: Option<String>,
  ) -> bool {
    self
      .try_approve_request(request_id, responder_id, comments)
      .is_ok()
  }

  pub fn reject_request(
    &mut self,
    request_id: &str,
    responder_id: &str,
    comments: Option<String>,
  ) -> bool {
    self
      .try_reject_request(request_id, responder_id, comments)
      .is_ok()
  }

  pub fn try_start_workflow(
    &mut self,
    process_id: &str,
    workflow_id: &str,
  ) -> Result<Started, ActionError> {
    let result = self.store.start_workflow(process_id, workflow_id);
    match &result {
      Ok(started) => {
        info!(
          process_id = %started.process_id,
          workflow_id = %started.workflow_id,
          step_id = %started.initial_step_id,
          "workflow_started"
        );
        self.notifier.notify(WorkflowEvent::WorkflowStarted {
          process_id: started.process_id.clone(),
          workflow_id: started.workflow_id.clone(),
          workflow_name: started.workflow_name.clone(),
        });
      }
      Err(e) => self.fail(Action::StartWorkflow, e),
    }
    result
  }

  pub fn try_create_approval_request(
    &mut self,
    process_id: &str,
    requester_id: &str,
    requester_role: ApprovalRole,
    comments: Option<String>,
  ) -> Result<RequestCreated, ActionError> {
    let result = self.store.create_approval_request(
      process_id,
      requester_id,
      requester_role,
      comments,
      Utc::now(),
    );
    match &result {
      Ok(created) => {
        info!(
          process_id = %created.process_id,
          request_id = %created.request_id,
          step_id = %created.step_id,
          requester_id = %requester_id,
          requester_role = %requester_role,
          "approval_requested"
        );
        self.notifier.notify(WorkflowEvent::ApprovalRequested {
          request_id: created.request_id.clone(),
          process_id: created.process_id.clone(),
          step_id: created.step_id.clone(),
        });
      }
      Err(e) => self.fail(Action::CreateApprovalRequest, e),
    }
    result
  }

  pub fn try_approve_request(
    &mut self,
    request_id: &str,
    responder_id: &str,
    comments: Option<String>,
  ) -> Result<Approved, ActionError> {
    let result = self
      .store
      .approve_request(request_id, responder_id, comments, Utc::now());
    match &result {
      Ok(approved) => {
        info!(
          process_id = %approved.process_id,
          request_id = %approved.request_id,
          step_id = %approved.step_id,
          responder_id = %responder_id,
          transition = ?approved.transition,
          "request_approved"
        );
        self.notifier.notify(approval_event(approved));
      }
      Err(e) => self.fail(Action::ApproveRequest, e),
    }
    result
  }

  pub fn try_reject_request(
    &mut self,
    request_id: &str,
    responder_id: &str,
    comments: Option<String>,
  ) -> Result<Rejected, ActionError> {
    let result = self
      .store
      .reject_request(request_id, responder_id, comments, Utc::now());
    match &result {
      Ok(rejected) => {
        info!(
          process_id = %rejected.process_id,
          request_id = %rejected.request_id,
          step_id = %rejected.step_id,
          responder_id = %responder_id,
          "request_rejected"
        );
        self.notifier.notify(WorkflowEvent::RequestRejected {
          request_id: rejected.request_id.clone(),
          process_id: rejected.process_id.clone(),
        });
      }
      Err(e) => self.fail(Action::RejectRequest, e),
    }
    result
  }

  fn fail(&self, action: Action, error: &ActionError) {
    warn!(action = ?action, error = %error, "action_failed");
    self.notifier.notify(WorkflowEvent::ActionFailed {
      action,
      error: error.to_string(),
    });
  }
}

fn approval_event(approved: &Approved) -> WorkflowEvent {
  let request_id = approved.request_id.clone();
  let process_id = approved.process_id.clone();
  match &approved.transition {
    Transition::Advanced { next_step_id } => WorkflowEvent::StepAdvanced {
      request_id,
      process_id,
      next_step_id: next_step_id.clone(),
    },
    Transition::Completed => WorkflowEvent::WorkflowCompleted {
      request_id,
      process_id,
    },
    Transition::Unchanged => WorkflowEvent::RequestApproved {
      request_id,
      process_id,
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tradeflow_workflow::Catalog;

  use crate::events::ChannelNotifier;

  fn builtin_store() -> WorkflowStore {
    WorkflowStore::new(Catalog::builtin().unwrap())
  }

  #[test]
  fn test_bool_api() {
    let mut engine = WorkflowEngine::new(builtin_store());
    assert!(engine.start_workflow("IMP-2023-001", "purchase-order-flow"));
    assert!(!engine.start_workflow("IMP-2023-001", "purchase-order-flow"));
    assert!(!engine.start_workflow("IMP-2023-002", "missing-flow"));
    assert!(!engine.approve_request("req-unknown", "u-1", None));
    assert!(!engine.reject_request("req-unknown", "u-1", None));
    assert!(engine.create_approval_request("IMP-2023-001", "u-1", ApprovalRole::Buyer, None));
    assert!(!engine.create_approval_request("IMP-9", "u-1", ApprovalRole::Buyer, None));
  }

  #[test]
  fn test_every_action_emits_one_event() {
    let (notifier, mut events) = ChannelNotifier::channel();
    let mut engine = WorkflowEngine::with_notifier(builtin_store(), notifier);

    engine.start_workflow("IMP-2023-001", "purchase-order-flow");
    engine.start_workflow("IMP-2023-001", "purchase-order-flow");
    let created = engine
      .try_create_approval_request("IMP-2023-001", "u-1", ApprovalRole::Buyer, None)
      .unwrap();
    engine.approve_request(&created.request_id, "m-1", None);

    assert!(matches!(
      events.try_recv().unwrap(),
      WorkflowEvent::WorkflowStarted { .. }
    ));
    assert!(matches!(
      events.try_recv().unwrap(),
      WorkflowEvent::ActionFailed {
        action: Action::StartWorkflow,
        ..
      }
    ));
    assert!(matches!(
      events.try_recv().unwrap(),
      WorkflowEvent::ApprovalRequested { .. }
    ));
    assert_eq!(
      events.try_recv().unwrap(),
      WorkflowEvent::StepAdvanced {
        request_id: created.request_id,
        process_id: "IMP-2023-001".to_string(),
        next_step_id: "po-approval".to_string(),
      }
    );
    assert!(events.try_recv().is_err());
  }

  #[test]
  fn test_failure_notification_text() {
    let (notifier, mut events) = ChannelNotifier::channel();
    let mut engine = WorkflowEngine::with_notifier(builtin_store(), notifier);

    engine.start_workflow("IMP-1", "nope");
    let notification = events.try_recv().unwrap().notification();
    assert_eq!(notification.title, "Failed to start workflow");
    assert_eq!(notification.description, "workflow 'nope' not found");
  }
}
