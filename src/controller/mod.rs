//! # Controller
//!
//! Claim reconciliation for `GitLab` resources.
//!
//! - `store`: object access against the API server
//! - `class`: provisioning class resolution
//! - `reconciler`: bucket claim reconciliation and secret derivation
//! - `helm_values`: projection of connection secrets into chart values

pub mod class;
pub mod helm_values;
pub mod reconciler;
pub mod store;
