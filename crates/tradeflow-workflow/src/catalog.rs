use std::collections::HashSet;

use tradeflow_config::CatalogDef;

use crate::definition::WorkflowDefinition;
use crate::error::WorkflowError;

const BUILTIN_CATALOG: &str = include_str!("../catalog/builtin.json");

/// An ordered set of workflow definitions with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
  workflows: Vec<WorkflowDefinition>,
}

impl Catalog {
  /// Build a catalog from already validated definitions.
  pub fn new(workflows: Vec<WorkflowDefinition>) -> Result<Self, WorkflowError> {
    let mut seen = HashSet::with_capacity(workflows.len());
    for workflow in &workflows {
      if !seen.insert(workflow.id()) {
        return Err(WorkflowError::DuplicateWorkflow(workflow.id().to_string()));
      }
    }
    Ok(Self { workflows })
  }

  /// Validate every definition of a catalog file.
  pub fn from_def(def: CatalogDef) -> Result<Self, WorkflowError> {
    let workflows = def
      .workflows
      .into_iter()
      .map(WorkflowDefinition::try_from)
      .collect::<Result<Vec<_>, _>>()?;
    Self::new(workflows)
  }

  /// Parse and validate a JSON catalog.
  pub fn from_json(json: &str) -> Result<Self, WorkflowError> {
    Self::from_def(CatalogDef::from_json(json)?)
  }

  /// The trade operations templates: purchase orders, import documents,
  /// customs release, payments and cargo reception.
  pub fn builtin() -> Result<Self, WorkflowError> {
    Self::from_json(BUILTIN_CATALOG)
  }

  /// Add a definition, e.g. one assembled with
  /// [`WorkflowBuilder`](crate::WorkflowBuilder).
  pub fn insert(&mut self, workflow: WorkflowDefinition) -> Result<(), WorkflowError> {
    if self.get(workflow.id()).is_some() {
      return Err(WorkflowError::DuplicateWorkflow(workflow.id().to_string()));
    }
    self.workflows.push(workflow);
    Ok(())
  }

  /// First definition with the given id.
  pub fn get(&self, workflow_id: &str) -> Option<&WorkflowDefinition> {
    self.workflows.iter().find(|w| w.id() == workflow_id)
  }

  pub fn iter(&self) -> impl Iterator<Item = &WorkflowDefinition> {
    self.workflows.iter()
  }

  pub fn len(&self) -> usize {
    self.workflows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.workflows.is_empty()
  }

  pub fn to_def(&self) -> CatalogDef {
    CatalogDef {
      workflows: self.workflows.iter().map(WorkflowDefinition::to_def).collect(),
    }
  }
}
