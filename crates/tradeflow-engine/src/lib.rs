//! Tradeflow Approval Engine
//!
//! This crate wraps the pure transitions of `tradeflow-store` with event
//! dispatch, structured logging and dashboard statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      WorkflowEngine<N>                      │
//! │  - start_workflow / create_approval_request                 │
//! │  - approve_request / reject_request → bool                  │
//! │  - one WorkflowEvent per action, sent to N: Notifier        │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       WorkflowStore                         │
//! │  - catalog, process registry, pending queue                 │
//! │  - transitions → Result<Outcome, ActionError>               │
//! │  - read-only queries                                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use tradeflow_engine::{ApprovalRole, Catalog, ChannelNotifier, WorkflowEngine, WorkflowStore};
//!
//! let store = WorkflowStore::new(Catalog::builtin().unwrap());
//! let (notifier, mut events) = ChannelNotifier::channel();
//! let mut engine = WorkflowEngine::with_notifier(store, notifier);
//!
//! assert!(engine.start_workflow("IMP-2023-001", "purchase-order-flow"));
//! let request = engine
//!   .try_create_approval_request("IMP-2023-001", "buyer-1", ApprovalRole::Buyer, None)
//!   .unwrap();
//! assert!(engine.approve_request(&request.request_id, "buyer-2", None));
//!
//! let current = engine.store().get_current_step("IMP-2023-001").unwrap();
//! assert_eq!(current.id, "po-approval");
//!
//! while let Ok(event) = events.try_recv() {
//!   println!("{}", event.notification().title);
//! }
//! ```

mod engine;
mod events;
mod stats;

pub use engine::WorkflowEngine;
pub use events::{
  Action, ChannelNotifier, NoopNotifier, Notification, Notifier, Variant, WorkflowEvent,
};
pub use stats::ApprovalStats;

// Re-export the state and definition types the engine operates on
pub use tradeflow_config::ApprovalRole;
pub use tradeflow_store::{
  ActionError, ApprovalRequest, ApprovalStatus, Approved, ProcessWorkflow, Rejected,
  RequestCreated, Started, StoreSnapshot, Transition, WorkflowStatus, WorkflowStore,
};
pub use tradeflow_workflow::{ApprovalStep, Catalog, WorkflowBuilder, WorkflowDefinition};
