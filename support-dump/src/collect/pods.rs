use super::{capture, step_dir, store, DumpReport};
use crate::{
    config::DumpConfig,
    constants::{
        CONTAINER_SHELL, DATABASE_CONTAINER, DATABASE_DIAGNOSTIC_COMMANDS,
        GENERIC_DIAGNOSTIC_COMMANDS, PG_POD_DETAILS_DIR, POD_LOGS_DIR,
    },
    discovery::{list_containers, list_pg_pods, list_pods},
    utils::{CommandRunner, KubeCommand},
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a container does in a database pod, decides which diagnostics are run in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRole {
    /// The postgres container, managed by patroni.
    Database,
    /// Any sidecar.
    Other,
}

impl ContainerRole {
    pub fn from_container_name(name: &str) -> Self {
        if name == DATABASE_CONTAINER {
            Self::Database
        } else {
            Self::Other
        }
    }

    /// The generic diagnostics followed by the role specific ones.
    pub fn diagnostic_commands(&self) -> Vec<&'static str> {
        let specific: &[&'static str] = match self {
            Self::Database => &DATABASE_DIAGNOSTIC_COMMANDS,
            Self::Other => &[],
        };
        GENERIC_DIAGNOSTIC_COMMANDS
            .iter()
            .chain(specific)
            .copied()
            .collect()
    }
}

/// `<pod>_<container>.log` under `dir`.
fn container_log_path(dir: &Path, pod: &str, container: &str) -> PathBuf {
    dir.join(format!("{pod}_{container}.log"))
}

/// `exec` of `shell_command` through bash inside a container.
pub(crate) fn exec_command(
    config: &DumpConfig,
    pod: &str,
    container: &str,
    shell_command: &str,
) -> KubeCommand {
    config.namespaced_command(["exec", "-it"]).args([
        pod,
        "-c",
        container,
        "--",
        CONTAINER_SHELL,
        "-c",
        shell_command,
    ])
}

/// Save the log of every container of every product pod under `pod_logs/`.
pub async fn collect_pods_logs(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    info!("Collecting pod logs:");
    let logs_dir = Path::new(POD_LOGS_DIR);
    if step_dir(config, report, "pod logs", logs_dir).await.is_none() {
        return;
    }

    let pods = list_pods(runner, config).await;
    if pods.is_empty() {
        warn!("Could not get pods list - skipping pods logs collection");
        report.skipped("pod logs", "no pods found");
        return;
    }

    for pod in &pods {
        let containers = list_containers(runner, config, pod).await;
        if containers.is_empty() {
            report.skipped(format!("pod logs {pod}"), "no containers found");
            continue;
        }
        for container in containers {
            let step = format!("pod logs {pod}/{container}");
            let cmd = config
                .namespaced_command(["logs"])
                .args([pod.as_str(), "-c", container.as_str()]);
            match capture(runner, &cmd).await {
                Ok(output) => {
                    let path = container_log_path(logs_dir, pod, &container);
                    if store(config, report, &step, path, &output.combined()).await {
                        info!("  + pod:{pod}, container:{container}");
                    }
                }
                Err(reason) => report.skipped(step, reason),
            }
        }
    }
}

/// Run the diagnostic commands in every container of every database pod, the output of one
/// container's commands goes to one file under `pg_pod_details/`.
pub async fn collect_pg_pod_details(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    info!("Collecting PG pod details:");
    let details_dir = Path::new(PG_POD_DETAILS_DIR);
    if step_dir(config, report, "pg pod details", details_dir)
        .await
        .is_none()
    {
        return;
    }

    let pods = list_pg_pods(runner, config).await;
    if pods.is_empty() {
        warn!("Could not get pods list - skipping PG pod details collection");
        report.skipped("pg pod details", "no database pods found");
        return;
    }

    for pod in &pods {
        let containers = list_containers(runner, config, pod).await;
        if containers.is_empty() {
            report.skipped(format!("pg pod details {pod}"), "no containers found");
            continue;
        }
        for container in containers {
            let step = format!("pg pod details {pod}/{container}");
            let role = ContainerRole::from_container_name(&container);

            let mut details = Vec::new();
            for command in role.diagnostic_commands() {
                let cmd = exec_command(config, pod, &container, command);
                if let Ok(output) = capture(runner, &cmd).await {
                    details.extend(output.combined());
                }
            }

            if details.is_empty() {
                report.skipped(step, "every diagnostic command failed");
                continue;
            }
            let path = container_log_path(details_dir, pod, &container);
            if store(config, report, &step, path, &details).await {
                info!("  + pod:{pod}, container:{container}");
            }
        }
    }
}
