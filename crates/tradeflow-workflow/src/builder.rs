use tradeflow_config::{ApprovalRole, StepDef, WorkflowDef};

use crate::definition::WorkflowDefinition;
use crate::error::WorkflowError;

/// Incrementally assembles a custom linear workflow.
///
/// Appending a step links the previous tail to it; removing a step relinks
/// its neighbours. The first step can never be removed.
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
  workflow_id: String,
  name: String,
  description: String,
  steps: Vec<StepDef>,
  next_index: usize,
}

impl WorkflowBuilder {
  pub fn new(workflow_id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      workflow_id: workflow_id.into(),
      name: name.into(),
      description: String::new(),
      steps: Vec::new(),
      next_index: 1,
    }
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn rename(&mut self, name: impl Into<String>) {
    self.name = name.into();
  }

  /// Append a step and return its generated id (`step-<n>`).
  pub fn add_step(&mut self, name: impl Into<String>, required_role: ApprovalRole) -> String {
    let step_id = format!("step-{}", self.next_index);
    self.next_index += 1;

    if let Some(tail) = self.steps.last_mut() {
      tail.next_step_id = Some(step_id.clone());
    }

    self.steps.push(StepDef {
      step_id: step_id.clone(),
      name: name.into(),
      description: String::new(),
      required_role,
      next_step_id: None,
      previous_step_id: None,
    });

    step_id
  }

  /// Remove a step other than the first. Returns false if nothing was removed.
  pub fn remove_step(&mut self, step_id: &str) -> bool {
    let Some(index) = self.steps.iter().position(|s| s.step_id == step_id) else {
      return false;
    };
    if index == 0 {
      return false;
    }

    let removed = self.steps.remove(index);
    self.steps[index - 1].next_step_id = removed.next_step_id;
    true
  }

  /// Change the role that approves a step.
  pub fn set_required_role(&mut self, step_id: &str, required_role: ApprovalRole) -> bool {
    self
      .step_mut(step_id)
      .map(|step| step.required_role = required_role)
      .is_some()
  }

  pub fn set_step_description(&mut self, step_id: &str, description: impl Into<String>) -> bool {
    let description = description.into();
    self
      .step_mut(step_id)
      .map(|step| step.description = description)
      .is_some()
  }

  pub fn steps(&self) -> &[StepDef] {
    &self.steps
  }

  /// Validate and lock the workflow. A name and at least two steps are required.
  pub fn build(&self) -> Result<WorkflowDefinition, WorkflowError> {
    if self.name.trim().is_empty() {
      return Err(WorkflowError::EmptyName(self.workflow_id.clone()));
    }
    if self.steps.len() < 2 {
      return Err(WorkflowError::TooFewSteps(self.workflow_id.clone()));
    }

    WorkflowDefinition::try_from(WorkflowDef {
      workflow_id: self.workflow_id.clone(),
      name: self.name.clone(),
      description: self.description.clone(),
      initial_step_id: self.steps[0].step_id.clone(),
      steps: self.steps.clone(),
    })
  }

  fn step_mut(&mut self, step_id: &str) -> Option<&mut StepDef> {
    self.steps.iter_mut().find(|s| s.step_id == step_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_add_steps_links_chain() {
    let mut builder = WorkflowBuilder::new("custom", "Custom Flow");
    let first = builder.add_step("Order Creation", ApprovalRole::Buyer);
    let second = builder.add_step("Order Approval", ApprovalRole::Manager);

    let definition = builder.build().unwrap();
    assert_eq!(definition.initial_step_id(), first);
    assert_eq!(
      definition.get_step(&first).unwrap().next_step_id.as_deref(),
      Some(second.as_str())
    );
    assert!(definition.get_step(&second).unwrap().is_terminal());
  }

  #[test]
  fn test_remove_middle_step_relinks() {
    let mut builder = WorkflowBuilder::new("custom", "Custom Flow");
    let a = builder.add_step("A", ApprovalRole::Operator);
    let b = builder.add_step("B", ApprovalRole::Manager);
    let c = builder.add_step("C", ApprovalRole::Admin);

    assert!(builder.remove_step(&b));
    assert_eq!(builder.steps()[0].next_step_id.as_deref(), Some(c.as_str()));

    // Generated ids never repeat after a removal
    let d = builder.add_step("D", ApprovalRole::Viewer);
    assert_eq!(d, "step-4");

    let definition = builder.build().unwrap();
    let ids: Vec<&str> = definition.steps().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![a.as_str(), c.as_str(), d.as_str()]);
  }

  #[test]
  fn test_first_step_cannot_be_removed() {
    let mut builder = WorkflowBuilder::new("custom", "Custom Flow");
    let a = builder.add_step("A", ApprovalRole::Operator);
    builder.add_step("B", ApprovalRole::Manager);

    assert!(!builder.remove_step(&a));
    assert!(!builder.remove_step("missing"));
    assert_eq!(builder.steps().len(), 2);
  }

  #[test]
  fn test_name_required() {
    let mut builder = WorkflowBuilder::new("custom", "");
    builder.add_step("A", ApprovalRole::Operator);
    builder.add_step("B", ApprovalRole::Manager);

    assert!(matches!(builder.build(), Err(WorkflowError::EmptyName(_))));

    builder.rename("Named");
    assert!(builder.build().is_ok());
  }

  #[test]
  fn test_two_steps_required() {
    let mut builder = WorkflowBuilder::new("custom", "Custom Flow");
    builder.add_step("A", ApprovalRole::Operator);

    assert!(matches!(builder.build(), Err(WorkflowError::TooFewSteps(_))));
  }

  #[test]
  fn test_update_step() {
    let mut builder = WorkflowBuilder::new("custom", "Custom Flow").description("Ad hoc");
    let a = builder.add_step("A", ApprovalRole::Admin);
    builder.add_step("B", ApprovalRole::Admin);

    assert!(builder.set_required_role(&a, ApprovalRole::Finance));
    assert!(builder.set_step_description(&a, "Raise the request"));
    assert!(!builder.set_required_role("missing", ApprovalRole::Finance));

    let definition = builder.build().unwrap();
    let step = definition.get_step(&a).unwrap();
    assert_eq!(step.required_role, ApprovalRole::Finance);
    assert_eq!(step.description, "Raise the request");
    assert_eq!(definition.description(), "Ad hoc");
  }
}
