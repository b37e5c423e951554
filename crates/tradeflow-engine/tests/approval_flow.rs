//! End-to-end approval flows through the engine facade.

use serde_json::json;
use tradeflow_engine::{
  ApprovalRole, ApprovalStats, ApprovalStatus, Catalog, ChannelNotifier, Transition, Variant,
  WorkflowBuilder, WorkflowEngine, WorkflowEvent, WorkflowStatus, WorkflowStore,
};

/// W1: S1 (manager) -> S2 (admin)
fn two_step_catalog() -> Catalog {
  let json = json!({
    "workflows": [{
      "workflow_id": "W1",
      "name": "Two Step",
      "initial_step_id": "S1",
      "steps": [
        { "step_id": "S1", "name": "Review", "required_role": "manager", "next_step_id": "S2" },
        { "step_id": "S2", "name": "Sign-off", "required_role": "admin" }
      ]
    }]
  });
  Catalog::from_json(&json.to_string()).unwrap()
}

fn drain(events: &mut tokio::sync::mpsc::UnboundedReceiver<WorkflowEvent>) -> Vec<WorkflowEvent> {
  let mut drained = Vec::new();
  while let Ok(event) = events.try_recv() {
    drained.push(event);
  }
  drained
}

#[test]
fn test_full_lifecycle_to_completion() {
  let (notifier, mut events) = ChannelNotifier::channel();
  let mut engine = WorkflowEngine::with_notifier(WorkflowStore::new(two_step_catalog()), notifier);

  assert!(engine.start_workflow("P1", "W1"));
  let process = engine.store().get_workflow_for_process("P1").unwrap();
  assert_eq!(process.current_step_id, "S1");
  assert_eq!(process.status, WorkflowStatus::Active);
  assert!(process.approval_history.is_empty());

  let first = engine
    .try_create_approval_request("P1", "op-1", ApprovalRole::Operator, None)
    .unwrap();
  let approved = engine
    .try_approve_request(&first.request_id, "mgr-1", Some("looks good".to_string()))
    .unwrap();
  assert_eq!(
    approved.transition,
    Transition::Advanced {
      next_step_id: "S2".to_string()
    }
  );

  let second = engine
    .try_create_approval_request("P1", "op-1", ApprovalRole::Operator, None)
    .unwrap();
  assert_eq!(second.step_id, "S2");
  let approved = engine
    .try_approve_request(&second.request_id, "adm-1", None)
    .unwrap();
  assert_eq!(approved.transition, Transition::Completed);

  let process = engine.store().get_workflow_for_process("P1").unwrap();
  assert_eq!(process.status, WorkflowStatus::Completed);
  assert_eq!(process.current_step_id, "S2");
  assert!(engine.store().get_next_step("P1").is_none());

  let history = engine.store().get_approval_history("P1");
  assert_eq!(history.len(), 2);
  assert!(history.iter().all(|r| r.status == ApprovalStatus::Approved));
  assert!(history.iter().all(|r| r.response_date.is_some()));
  assert_eq!(history[0].comments.as_deref(), Some("looks good"));

  let titles: Vec<String> = drain(&mut events)
    .iter()
    .map(|e| e.notification().title)
    .collect();
  assert_eq!(
    titles,
    vec![
      "Workflow started",
      "Approval request created",
      "Approval completed",
      "Approval request created",
      "Workflow completed",
    ]
  );
}

#[test]
fn test_rejection_then_retry() {
  let (notifier, mut events) = ChannelNotifier::channel();
  let mut engine = WorkflowEngine::with_notifier(WorkflowStore::new(two_step_catalog()), notifier);
  engine.start_workflow("P1", "W1");

  let rejected = engine
    .try_create_approval_request("P1", "op-1", ApprovalRole::Operator, None)
    .unwrap();
  assert!(engine.reject_request(&rejected.request_id, "mgr-1", Some("missing invoice".into())));

  let process = engine.store().get_workflow_for_process("P1").unwrap();
  assert_eq!(process.current_step_id, "S1");
  assert_eq!(process.status, WorkflowStatus::Active);
  assert!(engine.store().get_pending_request(&rejected.request_id).is_none());

  // Rejection does not block a new request for the same step
  let retry = engine
    .try_create_approval_request("P1", "op-1", ApprovalRole::Operator, None)
    .unwrap();
  assert_eq!(retry.step_id, "S1");
  assert!(engine.approve_request(&retry.request_id, "mgr-1", None));

  let history = engine.store().get_approval_history("P1");
  assert_eq!(history[0].status, ApprovalStatus::Rejected);
  assert_eq!(history[0].comments.as_deref(), Some("missing invoice"));
  assert_eq!(history[1].status, ApprovalStatus::Approved);

  let rejected_event = drain(&mut events)
    .into_iter()
    .find(|e| matches!(e, WorkflowEvent::RequestRejected { .. }))
    .unwrap();
  assert_eq!(rejected_event.notification().variant, Variant::Default);
}

#[test]
fn test_role_filtering_across_processes() {
  let mut engine = WorkflowEngine::new(WorkflowStore::new(two_step_catalog()));
  engine.start_workflow("P1", "W1");
  engine.start_workflow("P2", "W1");

  let id = engine
    .try_create_approval_request("P2", "op-1", ApprovalRole::Operator, None)
    .unwrap()
    .request_id;
  engine.approve_request(&id, "mgr-1", None);

  let manager = engine
    .try_create_approval_request("P1", "op-1", ApprovalRole::Operator, None)
    .unwrap();
  let admin = engine
    .try_create_approval_request("P2", "op-1", ApprovalRole::Operator, None)
    .unwrap();

  let for_manager = engine
    .store()
    .get_pending_approvals_for_role(ApprovalRole::Manager);
  assert_eq!(for_manager.len(), 1);
  assert_eq!(for_manager[0].id, manager.request_id);

  let for_admin = engine
    .store()
    .get_pending_approvals_for_role(ApprovalRole::Admin);
  assert_eq!(for_admin.len(), 1);
  assert_eq!(for_admin[0].id, admin.request_id);
}

#[test]
fn test_double_approval_is_rejected() {
  let (notifier, mut events) = ChannelNotifier::channel();
  let mut engine = WorkflowEngine::with_notifier(WorkflowStore::new(two_step_catalog()), notifier);
  engine.start_workflow("P1", "W1");

  let request = engine
    .try_create_approval_request("P1", "op-1", ApprovalRole::Operator, None)
    .unwrap();
  assert!(engine.approve_request(&request.request_id, "mgr-1", None));
  assert!(!engine.approve_request(&request.request_id, "mgr-1", None));
  assert_eq!(
    engine.store().get_workflow_for_process("P1").unwrap().current_step_id,
    "S2"
  );

  let last = drain(&mut events).pop().unwrap().notification();
  assert_eq!(last.title, "Failed to approve");
  assert_eq!(last.variant, Variant::Destructive);
}

#[test]
fn test_custom_workflow_in_catalog() {
  let mut builder = WorkflowBuilder::new("exchange-flow", "Exchange Contract Flow");
  builder.add_step("Contract Booking", ApprovalRole::Finance);
  builder.add_step("Contract Approval", ApprovalRole::FinanceManager);

  let mut catalog = Catalog::builtin().unwrap();
  catalog.insert(builder.build().unwrap()).unwrap();

  let mut engine = WorkflowEngine::new(WorkflowStore::new(catalog));
  assert!(engine.start_workflow("EXP-2024-010", "exchange-flow"));

  let request = engine
    .try_create_approval_request("EXP-2024-010", "fin-1", ApprovalRole::Finance, None)
    .unwrap();
  assert_eq!(request.step_id, "step-1");
  assert_eq!(
    engine
      .store()
      .get_pending_approvals_for_role(ApprovalRole::Finance)
      .len(),
    1
  );

  engine.approve_request(&request.request_id, "fin-2", None);
  let stats = ApprovalStats::collect(engine.store());
  assert_eq!(stats.approved, 1);
  assert_eq!(stats.pending, 0);
}

#[test]
fn test_snapshot_report() {
  let mut engine = WorkflowEngine::new(WorkflowStore::new(two_step_catalog()));
  engine.start_workflow("P1", "W1");
  let request = engine
    .try_create_approval_request("P1", "op-1", ApprovalRole::Operator, None)
    .unwrap();

  let snapshot = serde_json::to_value(engine.store().snapshot()).unwrap();
  assert_eq!(snapshot["pending_request_ids"], json!([request.request_id]));
  assert_eq!(
    snapshot["process_workflows"][0]["approval_history"][0]["status"],
    "pending"
  );
  assert_eq!(
    snapshot["process_workflows"][0]["approval_history"][0]["requester_role"],
    "operator"
  );
}
