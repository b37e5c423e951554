//! Tradeflow Store
//!
//! This crate owns the runtime state of the approval engine:
//! - the [`Catalog`](tradeflow_workflow::Catalog) of workflow templates
//! - the registry of [`ProcessWorkflow`]s, at most one per process id
//! - the queue of pending [`ApprovalRequest`]s
//!
//! All state lives in a single [`WorkflowStore`] value. Queries borrow it
//! immutably; the four actions (`start_workflow`, `create_approval_request`,
//! `approve_request`, `reject_request`) borrow it mutably and either apply a
//! complete transition or fail with an [`ActionError`] without touching it.
//!
//! Nothing is persisted. Dropping the store discards all workflow progress.

mod actions;
mod error;
mod store;
mod types;

pub use actions::{Approved, Rejected, RequestCreated, Started, Transition};
pub use error::ActionError;
pub use store::{StoreSnapshot, WorkflowStore};
pub use types::{ApprovalRequest, ApprovalStatus, ProcessWorkflow, WorkflowStatus};
