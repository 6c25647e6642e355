//! The collection steps of a support dump.
//!
//! Every step runs a kubernetes CLI command and writes what it printed under the run directory.
//! Steps never fail the dump, a step which could not collect its artifact records why in the
//! [`DumpReport`] and the next step runs.

use crate::{
    config::DumpConfig,
    utils::{write_artifact, CommandOutput, CommandRunner, KubeCommand},
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod cluster;
pub mod pg_logs;
pub mod pods;
pub mod resources;

/// What came of one collection step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The artifact was written, `path` is relative to the run directory.
    Collected { path: PathBuf },
    /// Nothing was written.
    Skipped { reason: String },
}

/// Outcome of every step of a run, in the order the steps ran.
#[derive(Debug, Default, Clone)]
pub struct DumpReport {
    entries: Vec<(String, StepOutcome)>,
}

impl DumpReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of the step called `step`.
    pub fn record(&mut self, step: impl Into<String>, outcome: StepOutcome) {
        self.entries.push((step.into(), outcome));
    }

    pub(crate) fn collected(&mut self, step: impl Into<String>, path: impl Into<PathBuf>) {
        self.record(step, StepOutcome::Collected { path: path.into() });
    }

    pub(crate) fn skipped(&mut self, step: impl Into<String>, reason: impl Into<String>) {
        self.record(
            step,
            StepOutcome::Skipped {
                reason: reason.into(),
            },
        );
    }

    pub fn entries(&self) -> &[(String, StepOutcome)] {
        self.entries.as_slice()
    }

    /// Paths of the collected artifacts.
    pub fn collected_paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|(_, outcome)| match outcome {
            StepOutcome::Collected { path } => Some(path.as_path()),
            StepOutcome::Skipped { .. } => None,
        })
    }

    /// Steps which collected nothing, with the reason.
    pub fn skipped_steps(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(step, outcome)| match outcome {
            StepOutcome::Skipped { reason } => Some((step.as_str(), reason.as_str())),
            StepOutcome::Collected { .. } => None,
        })
    }

    /// Log how many artifacts were collected and why the others were not.
    pub fn log_summary(&self) {
        let collected = self.collected_paths().count();
        let skipped: Vec<_> = self.skipped_steps().collect();
        info!(collected, skipped = skipped.len(), "Collection finished");
        for (step, reason) in skipped {
            warn!("  - not collected {step}: {reason}");
        }
    }
}

/// Run `command` and return what it printed. A command which cannot be launched or exits with
/// a failure is logged, and the reason returned as the error.
pub(crate) async fn capture(
    runner: &dyn CommandRunner,
    command: &KubeCommand,
) -> Result<CommandOutput, String> {
    match runner.run(command).await {
        Ok(output) if output.success => Ok(output),
        Ok(output) => {
            let out = output.output_lossy();
            warn!("Error when running {command}: {out}");
            Err(match output.exit_code {
                Some(code) => format!("'{command}' exited with {code}"),
                None => format!("'{command}' was terminated by a signal"),
            })
        }
        Err(error) => {
            warn!("Error when running {command}: {error}");
            Err(error.to_string())
        }
    }
}

/// Write `contents` to `relative` under the run directory and record the step outcome.
pub(crate) async fn store(
    config: &DumpConfig,
    report: &mut DumpReport,
    step: &str,
    relative: PathBuf,
    contents: &[u8],
) -> bool {
    match write_artifact(config.work_dir().join(&relative), contents).await {
        Ok(()) => {
            report.collected(step, relative);
            true
        }
        Err(error) => {
            warn!(%error, "Failed to save {step}");
            report.skipped(step, error.to_string());
            false
        }
    }
}

/// Run a command and save its output as a single file in the run directory.
pub(crate) async fn collect_helper(
    runner: &dyn CommandRunner,
    config: &DumpConfig,
    report: &mut DumpReport,
    command: KubeCommand,
    file_name: &str,
    resource_name: &str,
) {
    match capture(runner, &command).await {
        Ok(output) => {
            let contents = output.combined();
            if store(config, report, resource_name, file_name.into(), &contents).await {
                info!("Collected {resource_name}");
            }
        }
        Err(reason) => report.skipped(resource_name, reason),
    }
}

/// Create a directory under the run directory for a step. Returns `None`, after recording the
/// step as skipped, if that fails.
pub(crate) async fn step_dir(
    config: &DumpConfig,
    report: &mut DumpReport,
    step: &str,
    relative: &Path,
) -> Option<PathBuf> {
    let dir = config.work_dir().join(relative);
    match tokio::fs::create_dir_all(&dir).await {
        Ok(()) => Some(dir),
        Err(error) => {
            warn!(path = %dir.display(), %error, "Failed to create directory");
            report.skipped(step, format!("cannot create {}: {error}", dir.display()));
            None
        }
    }
}

/// Run every collection step, in order.
pub async fn run_collectors(runner: &dyn CommandRunner, config: &DumpConfig) -> DumpReport {
    let mut report = DumpReport::new();

    cluster::collect_kube_version(runner, config, &mut report).await;
    cluster::collect_node_info(runner, config, &mut report).await;
    cluster::collect_namespace_info(runner, config, &mut report).await;
    cluster::collect_events(runner, config, &mut report).await;
    cluster::collect_pvc_list(runner, config, &mut report).await;
    cluster::collect_pvc_details(runner, config, &mut report).await;
    cluster::collect_configmap_list(runner, config, &mut report).await;
    cluster::collect_configmap_details(runner, config, &mut report).await;
    resources::collect_api_resources(runner, config, &mut report).await;
    pg_logs::collect_pg_logs(runner, config, &mut report).await;
    pods::collect_pods_logs(runner, config, &mut report).await;
    pods::collect_pg_pod_details(runner, config, &mut report).await;

    report
}
