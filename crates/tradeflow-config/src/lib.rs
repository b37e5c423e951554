//! Tradeflow Config
//!
//! This crate contains the serializable approval workflow configuration types
//! for Tradeflow. These types represent workflow definitions before they are
//! validated and locked by `tradeflow-workflow`.
//!
//! Configuration can be loaded from:
//! - JSON catalog files (via CLI with `--catalog=workflows.json`)
//! - The built-in catalog shipped with `tradeflow-workflow`
//!
//! # Example
//!
//! ```json
//! {
//!   "workflows": [
//!     {
//!       "workflow_id": "payment-flow",
//!       "name": "Payment Flow",
//!       "initial_step_id": "payment-request",
//!       "steps": [
//!         { "step_id": "payment-request", "name": "Request", "required_role": "finance", "next_step_id": "payment-approval" },
//!         { "step_id": "payment-approval", "name": "Approval", "required_role": "finance_manager" }
//!       ]
//!     }
//!   ]
//! }
//! ```

mod role;
mod step;
mod workflow;

pub use role::{ApprovalRole, UnknownRole};
pub use step::StepDef;
pub use workflow::{CatalogDef, WorkflowDef};
