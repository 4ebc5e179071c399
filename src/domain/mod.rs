//! Domain layer for marketflow
//!
//! Pure value objects: workflow status, priority, type, metrics, and the
//! A/B test inputs and report shapes. Nothing here performs I/O.

pub mod errors;
pub mod models;

pub use errors::{DomainError, DomainResult};
