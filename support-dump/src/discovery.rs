use crate::{
    config::DumpConfig,
    constants::{PG_DATABASE_LABEL_SELECTOR, VENDOR_LABEL_SELECTOR},
    utils::{CommandRunner, KubeCommand},
};
use tracing::warn;

/// Names of every product pod in the namespace.
pub async fn list_pods(runner: &dyn CommandRunner, config: &DumpConfig) -> Vec<String> {
    list_pods_with_selector(runner, config, VENDOR_LABEL_SELECTOR).await
}

/// Names of the database pods in the namespace.
pub async fn list_pg_pods(runner: &dyn CommandRunner, config: &DumpConfig) -> Vec<String> {
    list_pods_with_selector(runner, config, PG_DATABASE_LABEL_SELECTOR).await
}

/// Names of the containers declared on `pod`, in spec order.
pub async fn list_containers(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    pod: &str,
) -> Vec<String> {
    let command = config.namespaced_command(["get", "pods"]).args([
        pod,
        "--no-headers",
        "-o=custom-columns=CONTAINERS:.spec.containers[*].name",
    ]);
    run_listing(runner, &command, "containers")
        .await
        .map(|out| parse_comma_separated(&out))
        .unwrap_or_default()
}

async fn list_pods_with_selector(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    selector: &str,
) -> Vec<String> {
    let command = config.namespaced_command(["get", "pod"]).args([
        "-l",
        selector,
        "-o=custom-columns=NAME:.metadata.name",
        "--no-headers",
    ]);
    run_listing(runner, &command, "pods")
        .await
        .map(|out| parse_lines(&out))
        .unwrap_or_default()
}

async fn run_listing(
    runner: &dyn CommandRunner,
    command: &KubeCommand,
    what: &str,
) -> Option<Vec<u8>> {
    match runner.run(command).await {
        Ok(output) if output.success => Some(output.stdout),
        Ok(output) => {
            warn!(%command, output = %output.output_lossy(), "Failed to get {what}");
            None
        }
        Err(error) => {
            warn!(%command, %error, "Failed to get {what}");
            None
        }
    }
}

/// One name per line, blank lines and trailing carriage returns dropped.
pub(crate) fn parse_lines(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// A single comma separated line of names.
pub(crate) fn parse_comma_separated(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}
