//! # Custom Resource Definitions
//!
//! Resource types read and written by the controller.
//!
//! ## Module Structure
//!
//! - `gitlab.rs` - The `GitLab` owner resource
//! - `bucket.rs` - The `Bucket` claim and its provisioner-written status
//! - `resource_class.rs` - Provisioning classes resolved for claims
//! - `reference.rs` - Object references shared by the above

mod bucket;
mod gitlab;
mod reference;
mod resource_class;

pub use bucket::{
    Bucket, BucketSpec, Condition, ResourceClaimStatus, CONDITION_CREATING, CONDITION_READY,
    CONDITION_STATUS_TRUE,
};
pub use gitlab::{GitLab, GitLabSpec};
pub use reference::{LocalObjectReference, ObjectReference};
pub use resource_class::{ResourceClass, ResourceClassSpec};
