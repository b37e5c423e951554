//! Replay of action scripts against an engine.
//!
//! A script is a JSON list of actions. `create_approval_request` may bind
//! the new request id to an alias; `approve_request` and `reject_request`
//! accept either an alias or a literal request id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tradeflow_engine::{
  Action, ApprovalRequest, ApprovalRole, ApprovalStats, Notifier, StoreSnapshot, WorkflowEngine,
  WorkflowStore,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
  StartWorkflow {
    process_id: String,
    workflow_id: String,
  },
  CreateApprovalRequest {
    process_id: String,
    requester_id: String,
    requester_role: ApprovalRole,
    #[serde(default)]
    comments: Option<String>,
    #[serde(default)]
    alias: Option<String>,
  },
  ApproveRequest {
    request: String,
    responder_id: String,
    #[serde(default)]
    comments: Option<String>,
  },
  RejectRequest {
    request: String,
    responder_id: String,
    #[serde(default)]
    comments: Option<String>,
  },
}

impl ScriptAction {
  fn action(&self) -> Action {
    match self {
      ScriptAction::StartWorkflow { .. } => Action::StartWorkflow,
      ScriptAction::CreateApprovalRequest { .. } => Action::CreateApprovalRequest,
      ScriptAction::ApproveRequest { .. } => Action::ApproveRequest,
      ScriptAction::RejectRequest { .. } => Action::RejectRequest,
    }
  }
}

pub fn parse(json: &str) -> Result<Vec<ScriptAction>, serde_json::Error> {
  serde_json::from_str(json)
}

/// Result of one replayed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
  pub index: usize,
  pub action: Action,
  pub ok: bool,
}

/// Replays actions in order. Failed actions do not stop the replay.
pub struct Replay<'e, N: Notifier> {
  engine: &'e mut WorkflowEngine<N>,
  aliases: HashMap<String, String>,
}

impl<'e, N: Notifier> Replay<'e, N> {
  pub fn new(engine: &'e mut WorkflowEngine<N>) -> Self {
    Self {
      engine,
      aliases: HashMap::new(),
    }
  }

  pub fn run(&mut self, actions: Vec<ScriptAction>) -> Vec<StepResult> {
    actions
      .into_iter()
      .enumerate()
      .map(|(index, action)| StepResult {
        index,
        action: action.action(),
        ok: self.apply(action),
      })
      .collect()
  }

  fn apply(&mut self, action: ScriptAction) -> bool {
    match action {
      ScriptAction::StartWorkflow {
        process_id,
        workflow_id,
      } => self.engine.start_workflow(&process_id, &workflow_id),
      ScriptAction::CreateApprovalRequest {
        process_id,
        requester_id,
        requester_role,
        comments,
        alias,
      } => {
        let created = self.engine.try_create_approval_request(
          &process_id,
          &requester_id,
          requester_role,
          comments,
        );
        match created {
          Ok(created) => {
            if let Some(alias) = alias {
              self.aliases.insert(alias, created.request_id);
            }
            true
          }
          Err(_) => false,
        }
      }
      ScriptAction::ApproveRequest {
        request,
        responder_id,
        comments,
      } => {
        let request_id = self.resolve(&request);
        self
          .engine
          .approve_request(&request_id, &responder_id, comments)
      }
      ScriptAction::RejectRequest {
        request,
        responder_id,
        comments,
      } => {
        let request_id = self.resolve(&request);
        self
          .engine
          .reject_request(&request_id, &responder_id, comments)
      }
    }
  }

  fn resolve(&self, request: &str) -> String {
    self
      .aliases
      .get(request)
      .cloned()
      .unwrap_or_else(|| request.to_string())
  }
}

/// The JSON document printed after a run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
  pub results: Vec<StepResult>,
  pub snapshot: StoreSnapshot,
  pub stats: ApprovalStats,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pending_for_role: Option<Vec<&'a ApprovalRequest>>,
}

impl<'a> Report<'a> {
  pub fn new(
    store: &'a WorkflowStore,
    results: Vec<StepResult>,
    role: Option<ApprovalRole>,
  ) -> Self {
    Self {
      results,
      snapshot: store.snapshot(),
      stats: ApprovalStats::collect(store),
      pending_for_role: role.map(|role| store.get_pending_approvals_for_role(role)),
    }
  }
}
