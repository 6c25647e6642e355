//! Collects diagnostic metadata of a Crunchy Data postgres deployment from a kubernetes or
//! OpenShift namespace and bundles it into a timestamped `.tar.gz` for support.
//!
//! Only cluster metadata and logs are collected, never secrets or database contents. All data
//! is fetched through the `oc` or `kubectl` binary found on the PATH.

use crate::{
    collect::DumpReport,
    error::{CreateDirectory, EmptyNamespace, Result},
};
use chrono::Local;
use snafu::{ensure, ResultExt};
use std::path::PathBuf;
use tracing::info;

pub mod archive;
pub mod collect;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod kube_cli;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use archive::ArchiveSize;
pub use config::DumpConfig;
pub use error::Error;
pub use kube_cli::KubeCli;
pub use utils::{CommandRunner, KubeCommand, SystemRunner};

/// What a finished run produced.
#[derive(Debug)]
pub struct DumpSummary {
    /// The run directory, left on disk.
    pub work_dir: PathBuf,
    /// The `.tar.gz` holding the run directory.
    pub archive: PathBuf,
    /// Size classification of the archive.
    pub size: ArchiveSize,
    /// What each collection step did.
    pub report: DumpReport,
}

/// Resolve the kubernetes CLI, check the cluster can be reached with it and settle the run
/// settings. Nothing is written to disk.
pub async fn init_session(
    runner: &dyn CommandRunner,
    namespace: &str,
    output_root: impl Into<PathBuf>,
    pg_log_limit: usize,
) -> Result<DumpConfig> {
    ensure!(!namespace.trim().is_empty(), EmptyNamespace);
    let kube_cli = kube_cli::resolve_kube_cli(runner).await?;
    kube_cli::check_cluster_access(runner, kube_cli).await?;
    Ok(
        DumpConfig::new(namespace, output_root, kube_cli, Local::now().naive_local())?
            .with_pg_log_limit(pg_log_limit),
    )
}

/// Create the run directory, run every collector and archive the result.
pub async fn run_dump(runner: &dyn CommandRunner, config: &DumpConfig) -> Result<DumpSummary> {
    let work_dir = config.work_dir();
    tokio::fs::create_dir_all(&work_dir)
        .await
        .context(CreateDirectory {
            path: work_dir.clone(),
        })?;
    info!("Saving support dump files in {}", work_dir.display());

    let report = collect::run_collectors(runner, config).await;
    report.log_summary();

    let archive = archive::archive_dump(config).await?;
    let size = archive::report_archive_size(&archive).await;

    Ok(DumpSummary {
        work_dir,
        archive,
        size,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::{API_RESOURCES, PG_LOGS_DIR, PG_POD_DETAILS_DIR, POD_LOGS_DIR},
        testing::ScriptedRunner,
    };
    use flate2::read::GzDecoder;
    use std::{collections::BTreeSet, fs::File, path::Path};
    use tempfile::TempDir;

    fn archive_entries(archive: &Path) -> BTreeSet<String> {
        tar::Archive::new(GzDecoder::new(File::open(archive).unwrap()))
            .entries()
            .unwrap()
            .map(|entry| entry.unwrap().path().unwrap().display().to_string())
            .map(|path| path.trim_end_matches('/').to_string())
            .collect()
    }

    fn connected_kubectl() -> ScriptedRunner {
        ScriptedRunner::new()
            .fail(&["which", "oc"], "")
            .ok(&["which", "kubectl"], "/usr/bin/kubectl")
            .ok(&["kubectl", "cluster-info"], "Kubernetes control plane is running")
    }

    #[tokio::test]
    async fn unreachable_cluster_stops_before_collection() {
        let root = TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .ok(&["which", "oc"], "/usr/bin/oc")
            .fail(&["oc", "whoami"], "error: You must be logged in to the server");

        let result = init_session(&runner, "pgdb", root.path(), 2).await;

        assert!(matches!(result, Err(Error::ClusterUnreachable { .. })));
        assert_eq!(runner.call_lines(), vec!["which oc", "oc whoami"]);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn empty_namespace_runs_no_command() {
        let root = TempDir::new().unwrap();
        let runner = connected_kubectl();

        let result = init_session(&runner, " ", root.path(), 2).await;

        assert!(matches!(result, Err(Error::EmptyNamespace)));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn full_run_archives_every_artifact() {
        let root = TempDir::new().unwrap();
        let runner = connected_kubectl()
            .ok(
                &["kubectl", "get", "pod", "-n", "pgdb", "-l", "vendor=crunchydata"],
                "hippo-0\n",
            )
            .ok(&["kubectl", "get", "pod"], "hippo-0\n")
            .ok(&["kubectl", "get", "pods", "-n", "pgdb", "hippo-0"], "database\n")
            .fail(&["kubectl", "get", "pgtasks"], "resource type not found")
            .ok(
                &[
                    "kubectl", "exec", "-it", "-n", "pgdb", "hippo-0", "-c", "database", "--",
                    "/bin/bash", "-c", "ls -d /pgdata/*/pg_log/* | head -2",
                ],
                "",
            )
            .ok(&["kubectl"], "output\n");

        let config = init_session(&runner, "pgdb", root.path(), 2).await.unwrap();
        let summary = run_dump(&runner, &config).await.unwrap();

        let dir_name = config.dir_name().to_string();
        assert_eq!(summary.archive, root.path().join(format!("{dir_name}.tar.gz")));
        assert!(summary.work_dir.is_dir());
        assert!(matches!(summary.size, ArchiveSize::Emailable(_)));

        let entries = archive_entries(&summary.archive);
        assert!(entries.contains(&dir_name));
        assert!(entries.iter().all(|entry| entry.starts_with(&dir_name)));
        for file in [
            "version.info",
            "nodes.info",
            "namespace.info",
            "events",
            "pvc.list",
            "pvc.details",
            "configmap.list",
            "configmap.details",
            "pod_logs/hippo-0_database.log",
            "pg_pod_details/hippo-0_database.log",
            PG_LOGS_DIR,
            "pg_logs/hippo-0",
        ] {
            assert!(
                entries.contains(&format!("{dir_name}/{file}")),
                "{file} missing from archive"
            );
        }
        for kind in API_RESOURCES {
            let present = entries.contains(&format!("{dir_name}/{kind}"));
            assert_eq!(present, kind != "pgtasks" && kind != "Routes", "{kind}");
        }
        assert!(summary
            .report
            .skipped_steps()
            .any(|(step, _)| step == "pgtasks"));
    }

    #[tokio::test]
    async fn no_pods_still_archives() {
        let root = TempDir::new().unwrap();
        let runner = connected_kubectl()
            .ok(&["kubectl", "get", "pod"], "")
            .ok(&["kubectl"], "output\n");

        let config = init_session(&runner, "pgdb", root.path(), 2).await.unwrap();
        let summary = run_dump(&runner, &config).await.unwrap();

        let entries = archive_entries(&summary.archive);
        let dir_name = config.dir_name();
        for dir in [POD_LOGS_DIR, PG_POD_DETAILS_DIR, PG_LOGS_DIR] {
            let prefix = format!("{dir_name}/{dir}");
            assert!(entries.contains(&prefix));
            assert!(!entries
                .iter()
                .any(|entry| entry.starts_with(&format!("{prefix}/"))));
        }
        assert!(!runner
            .call_lines()
            .iter()
            .any(|line| line.contains(" logs ") || line.contains(" exec ")));
    }

    #[tokio::test]
    async fn back_to_back_runs_do_not_collide() {
        let root = TempDir::new().unwrap();
        let runner = connected_kubectl().ok(&["kubectl"], "output\n");

        let first = init_session(&runner, "pgdb", root.path(), 2).await.unwrap();
        let first = run_dump(&runner, &first).await.unwrap();
        let second = init_session(&runner, "pgdb", root.path(), 2).await.unwrap();
        let second = run_dump(&runner, &second).await.unwrap();

        assert_ne!(first.archive, second.archive);
        assert!(first.archive.is_file());
        assert!(second.archive.is_file());
    }

    #[tokio::test]
    async fn unwritable_output_root_is_fatal() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let runner = connected_kubectl();

        let config = init_session(&runner, "pgdb", &blocker, 2).await.unwrap();
        let result = run_dump(&runner, &config).await;

        assert!(matches!(result, Err(Error::CreateDirectory { .. })));
        assert_eq!(runner.calls().len(), 3);
    }
}
