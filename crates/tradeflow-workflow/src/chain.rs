use std::collections::{HashMap, HashSet};

use tradeflow_config::StepDef;

use crate::error::WorkflowError;

/// Step chain of a workflow, resolved by following `next_step_id` links from
/// the initial step.
#[derive(Debug, Clone)]
pub(crate) struct Chain {
  /// Indices into the step list, in traversal order.
  order: Vec<usize>,
}

impl Chain {
  /// Resolve the chain, rejecting duplicate ids, dangling links, loops and
  /// steps that the traversal never reaches.
  pub(crate) fn resolve(
    workflow_id: &str,
    steps: &[StepDef],
    initial_step_id: &str,
  ) -> Result<Self, WorkflowError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
      if index.insert(step.step_id.as_str(), i).is_some() {
        return Err(WorkflowError::DuplicateStep {
          workflow_id: workflow_id.to_string(),
          step_id: step.step_id.clone(),
        });
      }
    }

    // Validate every link, including those on steps the walk may not reach
    for step in steps {
      let Some(next) = &step.next_step_id else {
        continue;
      };
      if !index.contains_key(next.as_str()) {
        return Err(WorkflowError::InvalidNextStep {
          workflow_id: workflow_id.to_string(),
          from: step.step_id.clone(),
          to: next.clone(),
        });
      }
    }

    let mut current = *index
      .get(initial_step_id)
      .ok_or_else(|| WorkflowError::InitialStepNotFound {
        workflow_id: workflow_id.to_string(),
        step_id: initial_step_id.to_string(),
      })?;

    let mut visited: HashSet<usize> = HashSet::with_capacity(steps.len());
    let mut order = Vec::with_capacity(steps.len());
    loop {
      if !visited.insert(current) {
        return Err(WorkflowError::CycleDetected {
          workflow_id: workflow_id.to_string(),
          step_id: steps[current].step_id.clone(),
        });
      }
      order.push(current);

      match &steps[current].next_step_id {
        Some(next) => current = index[next.as_str()],
        None => break,
      }
    }

    if let Some(orphan) = steps.iter().enumerate().find(|(i, _)| !visited.contains(i)) {
      return Err(WorkflowError::UnreachableStep {
        workflow_id: workflow_id.to_string(),
        step_id: orphan.1.step_id.clone(),
      });
    }

    Ok(Self { order })
  }

  /// Step indices in traversal order, initial step first.
  pub(crate) fn order(&self) -> &[usize] {
    &self.order
  }
}
