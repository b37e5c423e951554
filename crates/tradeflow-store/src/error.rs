//! Action errors.

/// Preconditions an action can fail on. A failed action leaves the store
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
  /// The process is already bound to a workflow, in any status.
  #[error("process '{process_id}' already has a workflow in progress")]
  WorkflowAlreadyExists { process_id: String },

  /// The requested template is not in the catalog.
  #[error("workflow '{workflow_id}' not found")]
  UnknownWorkflow { workflow_id: String },

  /// No workflow has been started for the process.
  #[error("no workflow found for process '{process_id}'")]
  NoWorkflowForProcess { process_id: String },

  /// The process workflow has already completed.
  #[error("no active workflow for process '{process_id}'")]
  WorkflowNotActive { process_id: String },

  /// The process references a template the catalog does not contain.
  #[error("workflow '{workflow_id}' of process '{process_id}' not found")]
  WorkflowDefinitionMissing {
    process_id: String,
    workflow_id: String,
  },

  /// The process points at a step its template does not define.
  #[error("no current step defined for process '{process_id}'")]
  CurrentStepMissing { process_id: String },

  /// No pending request carries the id.
  #[error("pending request '{request_id}' not found")]
  RequestNotFound { request_id: String },
}
