//! Tradeflow Workflow
//!
//! This crate provides the validated ("locked") representation of approval
//! workflow templates. A locked definition is produced from a
//! `tradeflow-config` [`WorkflowDef`](tradeflow_config::WorkflowDef) and is
//! guaranteed to be usable by the engine.
//!
//! Key differences from `tradeflow-config`:
//! - Step ids are unique and every `next_step_id` resolves
//! - Steps form a single acyclic chain starting at the initial step
//! - Every step is reachable from the initial step
//! - `previous_step_id` is derived from the chain
//!
//! A [`Catalog`] is an ordered set of locked definitions with unique ids.

mod builder;
mod catalog;
mod chain;
mod definition;
mod error;

pub use builder::WorkflowBuilder;
pub use catalog::Catalog;
pub use definition::{ApprovalStep, WorkflowDefinition};
pub use error::WorkflowError;

pub use tradeflow_config::ApprovalRole;
