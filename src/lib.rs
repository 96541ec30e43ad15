//! GitLab Bucket Controller Library
//!
//! Reconciles the object-storage claims a `GitLab` deployment needs and turns
//! the provisioned credentials into GitLab connection secrets and helm values.
//! Tests are included in the module files and under `tests/`.
//!
//! ## Quick Start
//!
//! ```rust
//! use gitlab_bucket_controller::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

// Re-export modules so they can be tested
pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod prelude;
pub mod provider;
