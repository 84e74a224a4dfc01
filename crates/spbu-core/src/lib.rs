//! SPBU Core — domain models, the permission evaluator, the approval
//! workflow state machine and repository traits shared by every crate.

pub mod error;
pub mod models;
pub mod permission;
pub mod repository;
pub mod workflow;
