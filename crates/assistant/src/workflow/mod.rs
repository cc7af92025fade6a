//! Workflow orchestration
//!
//! The controller coordinates the remote mail gateway and the draft store,
//! and exposes the operations and observable state a presentation layer
//! binds to.

mod controller;

pub use controller::{InitOutcome, WorkflowController, WorkflowStatus};
