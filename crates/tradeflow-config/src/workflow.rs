use serde::{Deserialize, Serialize};

use crate::step::StepDef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDef {
  pub workflow_id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub description: String,
  pub initial_step_id: String,
  pub steps: Vec<StepDef>,
}

/// A catalog file: the set of workflow templates available to processes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDef {
  pub workflows: Vec<WorkflowDef>,
}

impl CatalogDef {
  /// Parse a catalog from JSON text.
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }
}
