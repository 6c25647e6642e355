use super::{capture, store, DumpReport};
use crate::{
    config::DumpConfig,
    constants::{API_RESOURCES, OPENSHIFT_ONLY_RESOURCES},
    utils::CommandRunner,
};
use tracing::{debug, info, warn};

/// True if `kind` can be fetched with the run's CLI.
fn kind_supported(config: &DumpConfig, kind: &str) -> bool {
    config.kube_cli().is_openshift() || !OPENSHIFT_ONLY_RESOURCES.contains(&kind)
}

/// Fetch every kind of [`API_RESOURCES`] as yaml, one file named after each kind.
pub async fn collect_api_resources(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    info!("Collecting API resources:");
    for kind in API_RESOURCES {
        if !kind_supported(config, kind) {
            debug!(kind, cli = %config.kube_cli(), "Resource kind not available, skipping");
            continue;
        }

        let cmd = config
            .namespaced_command(["get", kind])
            .args(["-o", "yaml"]);
        match capture(runner, &cmd).await.map(|output| output.combined()) {
            Ok(output) if output.is_empty() => {
                warn!("Failed to get {kind} resource: no output");
                report.skipped(kind, "no output");
            }
            Ok(output) => {
                if store(config, report, kind, kind.into(), &output).await {
                    info!("  + {kind}");
                }
            }
            Err(reason) => {
                warn!("Failed to get {kind} resource");
                report.skipped(kind, reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        kube_cli::KubeCli,
        testing::{test_config, ScriptedRunner},
    };
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_kind_does_not_stop_the_others() {
        let root = TempDir::new().unwrap();
        let config = test_config(KubeCli::Kubectl, root.path());
        std::fs::create_dir_all(config.work_dir()).unwrap();
        let runner = ScriptedRunner::new()
            .fail(
                &["kubectl", "get", "pgpolicies"],
                "error: the server doesn't have a resource type \"pgpolicies\"",
            )
            .ok(&["kubectl", "get", "pgtasks"], "")
            .ok(&["kubectl", "get"], "apiVersion: v1\nitems: []\n");
        let mut report = DumpReport::new();

        collect_api_resources(&runner, &config, &mut report).await;

        let work_dir = config.work_dir();
        assert!(!work_dir.join("pgpolicies").exists());
        assert!(!work_dir.join("pgtasks").exists());
        assert!(!work_dir.join("Routes").exists());
        for kind in ["pods", "ReplicaSet", "NetworkPolicies", "pgclusters"] {
            assert_eq!(
                std::fs::read_to_string(work_dir.join(kind)).unwrap(),
                "apiVersion: v1\nitems: []\n"
            );
        }
        assert!(!runner
            .call_lines()
            .iter()
            .any(|line| line.contains("Routes")));
        assert!(runner
            .call_lines()
            .contains(&"kubectl get pods -n pgdb -o yaml".to_string()));
        assert_eq!(report.skipped_steps().count(), 2);
    }

    #[tokio::test]
    async fn routes_are_fetched_on_openshift() {
        let root = TempDir::new().unwrap();
        let config = test_config(KubeCli::Oc, root.path());
        std::fs::create_dir_all(config.work_dir()).unwrap();
        let runner = ScriptedRunner::new().ok(&["oc", "get"], "items: []\n");

        collect_api_resources(&runner, &config, &mut DumpReport::new()).await;

        assert!(config.work_dir().join("Routes").exists());
        assert_eq!(runner.calls().len(), API_RESOURCES.len());
    }
}
