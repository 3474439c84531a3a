//! Scatter pipeline: requests, planning, and materialization into a host scene.
pub mod batch;
pub mod bounds;
pub mod events;
pub mod input;
pub mod memory;
pub mod naming;
pub mod planner;
pub mod range;
pub mod request;
pub mod scene;
