//! # CRD Generator
//!
//! Generates the `GitLab` CustomResourceDefinition (CRD) YAML from the Rust
//! type definitions.
//!
//! ## Usage
//!
//! ```bash
//! # Generate CRD YAML
//! cargo run --bin crdgen > config/crd/gitlab.yaml
//!
//! # Generate and apply directly
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use gitlab_bucket_controller::crd::GitLab;
use kube::core::CustomResourceExt;

fn main() {
    let crd = GitLab::crd();

    match serde_yaml::to_string(&crd) {
        Ok(yaml) => {
            print!("{yaml}");
        }
        Err(e) => {
            eprintln!("Failed to serialize CRD to YAML: {e}");
            std::process::exit(1);
        }
    }
}
