use serde::Serialize;
use tradeflow_store::{ApprovalStatus, WorkflowStore};

/// Approval counts and turnaround across every process, as shown on the
/// dashboard approval widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApprovalStats {
  pub pending: usize,
  pub approved: usize,
  pub rejected: usize,
  /// Mean hours from request to decision; 0.0 when nothing was decided.
  pub average_response_hours: f64,
}

impl ApprovalStats {
  pub fn collect(store: &WorkflowStore) -> Self {
    let mut approved = 0;
    let mut rejected = 0;
    let mut decided = 0u32;
    let mut total_seconds = 0i64;

    let history = store
      .process_workflows()
      .flat_map(|process| process.approval_history.iter());

    for request in history {
      match request.status {
        ApprovalStatus::Approved => approved += 1,
        ApprovalStatus::Rejected => rejected += 1,
        ApprovalStatus::Pending => continue,
      }
      if let Some(elapsed) = request.response_time() {
        decided += 1;
        total_seconds += elapsed.num_seconds();
      }
    }

    let average_response_hours = if decided > 0 {
      total_seconds as f64 / 3600.0 / f64::from(decided)
    } else {
      0.0
    };

    Self {
      pending: store.pending_count(),
      approved,
      rejected,
      average_response_hours,
    }
  }
}
