//! Cross-cutting HTTP service plumbing shared by Commons services.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
pub mod validation;
