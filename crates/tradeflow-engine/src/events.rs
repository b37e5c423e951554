//! Workflow events and notifiers.
//!
//! Every action the engine performs emits exactly one event, success or
//! failure. Consumers decide what to do with them: show a toast, stream to a
//! UI, log, or ignore.

use serde::Serialize;
use tokio::sync::mpsc;

/// The action an event reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
  StartWorkflow,
  CreateApprovalRequest,
  ApproveRequest,
  RejectRequest,
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
  /// A process was bound to a workflow template.
  WorkflowStarted {
    process_id: String,
    workflow_id: String,
    workflow_name: String,
  },

  /// A pending approval request was raised.
  ApprovalRequested {
    request_id: String,
    process_id: String,
    step_id: String,
  },

  /// An approval moved the process to its next step.
  StepAdvanced {
    request_id: String,
    process_id: String,
    next_step_id: String,
  },

  /// An approval of the terminal step completed the workflow.
  WorkflowCompleted {
    request_id: String,
    process_id: String,
  },

  /// An approval was recorded for a step the process is no longer at.
  RequestApproved {
    request_id: String,
    process_id: String,
  },

  /// A request was rejected; the process stays where it is.
  RequestRejected {
    request_id: String,
    process_id: String,
  },

  /// An action failed a precondition and changed nothing.
  ActionFailed { action: Action, error: String },
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
  Default,
  Destructive,
}

/// A toast-style message describing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
  pub title: String,
  pub description: String,
  pub variant: Variant,
}

impl Notification {
  fn info(title: &str, description: String) -> Self {
    Self {
      title: title.to_string(),
      description,
      variant: Variant::Default,
    }
  }
}

impl WorkflowEvent {
  /// Render the event as a message for the user.
  pub fn notification(&self) -> Notification {
    match self {
      WorkflowEvent::WorkflowStarted {
        process_id,
        workflow_name,
        ..
      } => Notification::info(
        "Workflow started",
        format!(
          "A new \"{}\" workflow was started for process {}.",
          workflow_name, process_id
        ),
      ),
      WorkflowEvent::ApprovalRequested { process_id, .. } => Notification::info(
        "Approval request created",
        format!("A new request was created for process {}.", process_id),
      ),
      WorkflowEvent::StepAdvanced { process_id, .. } => Notification::info(
        "Approval completed",
        format!("Process {} advanced to the next step.", process_id),
      ),
      WorkflowEvent::WorkflowCompleted { process_id, .. } => Notification::info(
        "Workflow completed",
        format!(
          "The workflow for process {} was completed successfully.",
          process_id
        ),
      ),
      WorkflowEvent::RequestApproved { process_id, .. } => Notification::info(
        "Request approved",
        format!("The request for process {} was approved.", process_id),
      ),
      WorkflowEvent::RequestRejected { process_id, .. } => Notification::info(
        "Request rejected",
        format!("The request for process {} was rejected.", process_id),
      ),
      WorkflowEvent::ActionFailed { action, error } => {
        let title = match action {
          Action::StartWorkflow => "Failed to start workflow",
          Action::CreateApprovalRequest => "Failed to create request",
          Action::ApproveRequest => "Failed to approve",
          Action::RejectRequest => "Failed to reject",
        };
        Notification {
          title: title.to_string(),
          description: error.clone(),
          variant: Variant::Destructive,
        }
      }
    }
  }
}

/// Trait for receiving workflow events.
///
/// The engine calls `notify` once per action. Implementations decide what to
/// do with the event (display, broadcast, record, ignore, etc.).
pub trait Notifier: Send + Sync {
  /// Called when a workflow event occurs.
  fn notify(&self, event: WorkflowEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
  fn notify(&self, _event: WorkflowEvent) {}
}

/// A notifier that sends events to an unbounded channel.
///
/// Sending never blocks, so the engine is not held up by a slow consumer.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<WorkflowEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<WorkflowEvent>) -> Self {
    Self { sender }
  }

  /// Create a notifier together with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<WorkflowEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

impl Notifier for ChannelNotifier {
  fn notify(&self, event: WorkflowEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
