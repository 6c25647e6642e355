use super::{collect_helper, DumpReport};
use crate::{config::DumpConfig, utils::CommandRunner};
use tracing::debug;

/// Client and server versions.
pub async fn collect_kube_version(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let cmd = config.kube_command().arg("version");
    debug!("collecting kube version info: {cmd}");
    collect_helper(runner, config, report, cmd, "version.info", "version-info").await;
}

/// Wide listing of the cluster nodes.
pub async fn collect_node_info(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let cmd = config.kube_command().args(["get", "nodes", "-o", "wide"]);
    debug!("collecting node info: {cmd}");
    collect_helper(runner, config, report, cmd, "nodes.info", "node-info").await;
}

/// The project description on OpenShift, the namespace object elsewhere.
pub async fn collect_namespace_info(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let cmd = if config.kube_cli().is_openshift() {
        config
            .kube_command()
            .args(["describe", "project", config.namespace()])
    } else {
        config
            .kube_command()
            .args(["get", "namespace", "-o", "yaml", config.namespace()])
    };
    debug!("collecting namespace info: {cmd}");
    collect_helper(runner, config, report, cmd, "namespace.info", "namespace-info").await;
}

pub async fn collect_events(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let cmd = config.namespaced_command(["get", "events"]);
    collect_helper(runner, config, report, cmd, "events", "k8s events").await;
}

// The list and detail collectors below run against the context's current namespace.

pub async fn collect_pvc_list(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let cmd = config.kube_command().args(["get", "pvc"]);
    collect_helper(runner, config, report, cmd, "pvc.list", "pvc-list").await;
}

pub async fn collect_pvc_details(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let cmd = config.kube_command().args(["get", "pvc", "-o", "yaml"]);
    collect_helper(runner, config, report, cmd, "pvc.details", "pvc-details").await;
}

pub async fn collect_configmap_list(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let cmd = config.kube_command().args(["get", "configmap"]);
    collect_helper(runner, config, report, cmd, "configmap.list", "configmap-list").await;
}

pub async fn collect_configmap_details(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let cmd = config.kube_command().args(["get", "configmap", "-o", "yaml"]);
    collect_helper(
        runner,
        config,
        report,
        cmd,
        "configmap.details",
        "configmap-details",
    )
    .await;
}
