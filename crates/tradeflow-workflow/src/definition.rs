use serde::Serialize;
use tradeflow_config::{ApprovalRole, StepDef, WorkflowDef};

use crate::chain::Chain;
use crate::error::WorkflowError;

/// A locked approval step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalStep {
  pub id: String,
  pub name: String,
  pub description: String,
  pub required_role: ApprovalRole,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_step_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub previous_step_id: Option<String>,
}

impl ApprovalStep {
  /// A step with no successor ends the workflow once approved.
  pub fn is_terminal(&self) -> bool {
    self.next_step_id.is_none()
  }
}

/// A validated workflow template.
///
/// Steps are stored in chain order, so `steps()[0]` is the initial step and
/// each step's `next_step_id` names the one after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowDefinition {
  id: String,
  name: String,
  description: String,
  initial_step_id: String,
  steps: Vec<ApprovalStep>,
}

impl WorkflowDefinition {
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn initial_step_id(&self) -> &str {
    &self.initial_step_id
  }

  /// Steps in chain order.
  pub fn steps(&self) -> &[ApprovalStep] {
    &self.steps
  }

  /// Get a step by ID.
  pub fn get_step(&self, step_id: &str) -> Option<&ApprovalStep> {
    self.steps.iter().find(|step| step.id == step_id)
  }

  /// The step that follows `step_id`, if any.
  pub fn next_step(&self, step_id: &str) -> Option<&ApprovalStep> {
    let next = self.get_step(step_id)?.next_step_id.as_deref()?;
    self.get_step(next)
  }

  /// Convert back into its configuration form.
  pub fn to_def(&self) -> WorkflowDef {
    WorkflowDef {
      workflow_id: self.id.clone(),
      name: self.name.clone(),
      description: self.description.clone(),
      initial_step_id: self.initial_step_id.clone(),
      steps: self
        .steps
        .iter()
        .map(|step| StepDef {
          step_id: step.id.clone(),
          name: step.name.clone(),
          description: step.description.clone(),
          required_role: step.required_role,
          next_step_id: step.next_step_id.clone(),
          previous_step_id: step.previous_step_id.clone(),
        })
        .collect(),
    }
  }
}

impl TryFrom<WorkflowDef> for WorkflowDefinition {
  type Error = WorkflowError;

  fn try_from(def: WorkflowDef) -> Result<Self, Self::Error> {
    if def.name.trim().is_empty() {
      return Err(WorkflowError::EmptyName(def.workflow_id));
    }
    if def.steps.is_empty() {
      return Err(WorkflowError::NoSteps(def.workflow_id));
    }

    let chain = Chain::resolve(&def.workflow_id, &def.steps, &def.initial_step_id)?;

    let mut steps = Vec::with_capacity(def.steps.len());
    let mut previous: Option<String> = None;
    for &i in chain.order() {
      let step = &def.steps[i];
      steps.push(ApprovalStep {
        id: step.step_id.clone(),
        name: step.name.clone(),
        description: step.description.clone(),
        required_role: step.required_role,
        next_step_id: step.next_step_id.clone(),
        previous_step_id: previous.take(),
      });
      previous = Some(step.step_id.clone());
    }

    Ok(Self {
      id: def.workflow_id,
      name: def.name,
      description: def.description,
      initial_step_id: def.initial_step_id,
      steps,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn step(id: &str, role: ApprovalRole, next: Option<&str>) -> StepDef {
    StepDef {
      step_id: id.to_string(),
      name: format!("Step {}", id),
      description: String::new(),
      required_role: role,
      next_step_id: next.map(str::to_string),
      previous_step_id: None,
    }
  }

  fn three_step_def() -> WorkflowDef {
    WorkflowDef {
      workflow_id: "w1".to_string(),
      name: "Three Steps".to_string(),
      description: String::new(),
      initial_step_id: "s1".to_string(),
      steps: vec![
        step("s3", ApprovalRole::Admin, None),
        step("s1", ApprovalRole::Operator, Some("s2")),
        step("s2", ApprovalRole::Manager, Some("s3")),
      ],
    }
  }

  #[test]
  fn test_steps_stored_in_chain_order() {
    let definition = WorkflowDefinition::try_from(three_step_def()).unwrap();
    let ids: Vec<&str> = definition.steps().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
    assert_eq!(definition.initial_step_id(), "s1");
  }

  #[test]
  fn test_previous_step_derived() {
    let definition = WorkflowDefinition::try_from(three_step_def()).unwrap();
    assert_eq!(definition.get_step("s1").unwrap().previous_step_id, None);
    assert_eq!(
      definition.get_step("s3").unwrap().previous_step_id.as_deref(),
      Some("s2")
    );
  }

  #[test]
  fn test_next_step() {
    let definition = WorkflowDefinition::try_from(three_step_def()).unwrap();
    assert_eq!(definition.next_step("s1").unwrap().id, "s2");
    assert!(definition.next_step("s3").is_none());
    assert!(definition.next_step("unknown").is_none());
    assert!(definition.get_step("s3").unwrap().is_terminal());
  }

  #[test]
  fn test_empty_name_rejected() {
    let mut def = three_step_def();
    def.name = "  ".to_string();
    assert!(matches!(
      WorkflowDefinition::try_from(def),
      Err(WorkflowError::EmptyName(id)) if id == "w1"
    ));
  }

  #[test]
  fn test_no_steps_rejected() {
    let mut def = three_step_def();
    def.steps.clear();
    assert!(matches!(
      WorkflowDefinition::try_from(def),
      Err(WorkflowError::NoSteps(_))
    ));
  }

  #[test]
  fn test_round_trip_through_def() {
    let definition = WorkflowDefinition::try_from(three_step_def()).unwrap();
    let again = WorkflowDefinition::try_from(definition.to_def()).unwrap();
    assert_eq!(definition, again);
  }
}
