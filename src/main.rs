//! # GitLab Bucket Controller
//!
//! Reconciles every object-storage bucket of one `GitLab` resource once and
//! prints the merged helm values of the buckets that are ready.
//!
//! ## Usage
//!
//! ```bash
//! # Reconcile the buckets of gitlab/gitlab-demo and print helm values as YAML
//! gitlab-bucket-controller --namespace gitlab --name gitlab-demo
//!
//! # Same, as JSON
//! gitlab-bucket-controller --namespace gitlab --name gitlab-demo --output json
//! ```
//!
//! The process exits non-zero when any bucket failed to reconcile. It does not
//! watch or requeue; run it again to pick up claims that became ready.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gitlab_bucket_controller::config::ControllerConfig;
use gitlab_bucket_controller::controller::class::{
    KubeResourceClassResolver, ResourceClassResolver,
};
use gitlab_bucket_controller::controller::helm_values::Values;
use gitlab_bucket_controller::controller::reconciler::bucket_reconcilers;
use gitlab_bucket_controller::controller::store::{KubeStore, ObjectKey, ObjectStore};
use gitlab_bucket_controller::observability;
use gitlab_bucket_controller::provider::SecretUpdaters;
use kube::Client;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Reconcile the object-storage buckets of a GitLab resource
#[derive(Parser, Debug)]
#[command(name = "gitlab-bucket-controller", about, long_about = None)]
struct Cli {
    /// Namespace of the GitLab resource
    #[arg(short, long)]
    namespace: String,

    /// Name of the GitLab resource
    #[arg(long)]
    name: String,

    /// Format of the printed helm values
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn render(values: &Values, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Yaml => {
            serde_yaml::to_string(values).context("Failed to serialize helm values to YAML")
        }
        OutputFormat::Json => serde_json::to_string_pretty(values)
            .map(|json| format!("{json}\n"))
            .context("Failed to serialize helm values to JSON"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let cli = Cli::parse();
    let config = ControllerConfig::from_env();
    observability::init_tracing(&config);

    info!("Starting GitLab Bucket Controller");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    if config.enable_metrics {
        observability::register_metrics()?;
    }

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client. Ensure kubeconfig is configured.")?;

    let store: Arc<dyn ObjectStore> = Arc::new(KubeStore::new(client.clone()));
    let resolver: Arc<dyn ResourceClassResolver> =
        Arc::new(KubeResourceClassResolver::new(client));
    let updaters = Arc::new(SecretUpdaters::with_defaults());

    let key = ObjectKey::new(&cli.namespace, &cli.name);
    let owner = Arc::new(
        store
            .get_gitlab(&key)
            .await
            .with_context(|| format!("Failed to retrieve GitLab {key}"))?,
    );

    let mut reconcilers = bucket_reconcilers(&owner, &store, &resolver, &updaters);
    let total = reconcilers.len();
    let mut failed = 0usize;
    let mut values = Values::new();

    for reconciler in &mut reconcilers {
        if let Err(e) = reconciler.reconcile().await {
            error!("Failed to reconcile bucket {}: {}", reconciler.bucket_name(), e);
            failed += 1;
            continue;
        }

        if !reconciler.status().is_some_and(|status| status.is_ready()) {
            info!("Bucket {} is not ready yet", reconciler.bucket_name());
            continue;
        }

        if let Err(e) = reconciler
            .get_helm_values(&mut values, &config.helm_secret_prefix)
            .await
        {
            error!(
                "Failed to project helm values for bucket {}: {}",
                reconciler.bucket_name(),
                e
            );
            failed += 1;
        }
    }

    print!("{}", render(&values, cli.output)?);

    if config.enable_metrics {
        debug!("Metrics:\n{}", observability::gather_metrics()?);
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {total} buckets failed to reconcile");
    }
    info!("Reconciled {} buckets of GitLab {}", total, key);
    Ok(())
}
