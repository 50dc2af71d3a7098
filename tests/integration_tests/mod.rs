//! Integration tests module
//!
//! End-to-end runs of the pipeline with substitute collaborators:
//! - Complete feed → prompt → model → parse → mail pass
//! - Error handling for each collaborator

pub mod error_scenarios;
pub mod fixtures;
pub mod pipeline_test;
