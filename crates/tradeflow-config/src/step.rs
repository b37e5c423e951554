use serde::{Deserialize, Serialize};

use crate::role::ApprovalRole;

/// One approval step as written in a catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDef {
  pub step_id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub description: String,
  pub required_role: ApprovalRole,
  /// Absent on the terminal step.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_step_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub previous_step_id: Option<String>,
}
