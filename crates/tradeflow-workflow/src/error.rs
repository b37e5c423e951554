use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("workflow '{0}' has an empty name")]
  EmptyName(String),

  #[error("workflow '{0}' has no steps")]
  NoSteps(String),

  #[error("workflow '{0}' must have at least two steps")]
  TooFewSteps(String),

  #[error("duplicate step id '{step_id}' in workflow '{workflow_id}'")]
  DuplicateStep {
    workflow_id: String,
    step_id: String,
  },

  #[error("initial step '{step_id}' not found in workflow '{workflow_id}'")]
  InitialStepNotFound {
    workflow_id: String,
    step_id: String,
  },

  #[error("step references unknown next step: workflow={workflow_id}, from={from}, to={to}")]
  InvalidNextStep {
    workflow_id: String,
    from: String,
    to: String,
  },

  #[error("step chain of workflow '{workflow_id}' loops back to '{step_id}'")]
  CycleDetected {
    workflow_id: String,
    step_id: String,
  },

  #[error("step '{step_id}' is unreachable from the initial step of workflow '{workflow_id}'")]
  UnreachableStep {
    workflow_id: String,
    step_id: String,
  },

  #[error("duplicate workflow id: {0}")]
  DuplicateWorkflow(String),

  #[error("invalid catalog: {0}")]
  Parse(#[from] serde_json::Error),
}
