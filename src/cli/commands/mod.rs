//! CLI command implementations.

pub mod abtest;
pub mod metrics;
pub mod priority;
pub mod status;
pub mod workflow_type;
