use super::{capture, pods::exec_command, step_dir, DumpReport};
use crate::{
    config::DumpConfig,
    constants::{DATABASE_CONTAINER, PG_LOGS_DIR, PG_LOG_GLOB},
    discovery::{list_pg_pods, parse_lines},
    utils::CommandRunner,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Shell pipeline listing at most `limit` postgres log directories.
fn pg_log_listing(limit: usize) -> String {
    format!("ls -d {PG_LOG_GLOB} | head -{limit}")
}

/// Last component of a path inside the container.
fn remote_file_name(remote: &str) -> &str {
    remote
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(remote)
}

/// Copy the most recent postgres log directories of every database pod into `pg_logs/<pod>/`.
pub async fn collect_pg_logs(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
) {
    let limit = config.pg_log_limit();
    info!("Collecting last {limit} PG logs (This could take a while)");
    let logs_dir = Path::new(PG_LOGS_DIR);
    if step_dir(config, report, "pg logs", logs_dir).await.is_none() {
        return;
    }

    let pods = list_pg_pods(runner, config).await;
    if pods.is_empty() {
        warn!("Could not get pods list - skipping pods logs collection");
        report.skipped("pg logs", "no database pods found");
        return;
    }

    for pod in &pods {
        let step = format!("pg logs {pod}");
        let pod_dir: PathBuf = logs_dir.join(pod);
        let Some(target) = step_dir(config, report, &step, &pod_dir).await else {
            continue;
        };

        let listing = exec_command(config, pod, DATABASE_CONTAINER, &pg_log_listing(limit));
        let remote_paths = match capture(runner, &listing).await {
            Ok(output) => parse_lines(&output.stdout),
            Err(reason) => {
                report.skipped(step, reason);
                continue;
            }
        };

        for remote in remote_paths.iter().take(limit) {
            let destination = target.join(remote_file_name(remote));
            let copy = config
                .namespaced_command(["cp"])
                .args(["-c", DATABASE_CONTAINER])
                .arg(format!("{pod}:{remote}"))
                .arg(destination.to_string_lossy());
            match capture(runner, &copy).await {
                Ok(_) => report.collected(
                    format!("{step} {remote}"),
                    pod_dir.join(remote_file_name(remote)),
                ),
                Err(reason) => report.skipped(format!("{step} {remote}"), reason),
            }
        }
        info!("  + pod:{pod}");
    }
}
