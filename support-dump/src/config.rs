use crate::{
    constants::{
        ARCHIVE_EXTENSION, DEFAULT_PG_LOG_LIMIT, DIR_NAME_PREFIX, DIR_NAME_TIMESTAMP_FORMAT,
    },
    error::{EmptyNamespace, Result},
    kube_cli::KubeCli,
    utils::KubeCommand,
};
use chrono::{Duration, NaiveDateTime};
use snafu::ensure;
use std::path::{Path, PathBuf};

/// Settings of one support dump run. Built once the CLI is resolved and never changed after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    namespace: String,
    output_root: PathBuf,
    kube_cli: KubeCli,
    dir_name: String,
    pg_log_limit: usize,
}

impl DumpConfig {
    /// Create the run settings. The run directory is named after `started_at`, pushed forward a
    /// second at a time while a directory or archive of that name already sits in `output_root`.
    pub fn new(
        namespace: impl Into<String>,
        output_root: impl Into<PathBuf>,
        kube_cli: KubeCli,
        started_at: NaiveDateTime,
    ) -> Result<Self> {
        let namespace = namespace.into();
        ensure!(!namespace.trim().is_empty(), EmptyNamespace);

        let output_root = output_root.into();
        let dir_name = unique_dir_name(&output_root, started_at);
        Ok(Self {
            namespace,
            output_root,
            kube_cli,
            dir_name,
            pg_log_limit: DEFAULT_PG_LOG_LIMIT,
        })
    }

    /// Set how many postgres log directories are copied from each database pod.
    pub fn with_pg_log_limit(mut self, limit: usize) -> Self {
        self.pg_log_limit = limit;
        self
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    pub fn kube_cli(&self) -> KubeCli {
        self.kube_cli
    }

    pub fn pg_log_limit(&self) -> usize {
        self.pg_log_limit
    }

    /// Name of the run directory, also the root entry of the archive.
    pub fn dir_name(&self) -> &str {
        self.dir_name.as_str()
    }

    pub fn output_root(&self) -> &Path {
        self.output_root.as_path()
    }

    /// The run directory all artifacts are written under.
    pub fn work_dir(&self) -> PathBuf {
        self.output_root.join(&self.dir_name)
    }

    /// The run directory path with `.tar.gz` appended.
    pub fn archive_path(&self) -> PathBuf {
        archive_path_for(&self.output_root, &self.dir_name)
    }

    /// A CLI command with no arguments.
    pub fn kube_command(&self) -> KubeCommand {
        self.kube_cli.command()
    }

    /// A CLI command scoped to the run namespace.
    pub fn namespaced_command<I, S>(&self, args: I) -> KubeCommand
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kube_command()
            .args(args)
            .args(["-n", self.namespace.as_str()])
    }
}

/// `crunchy_k8s_support_dump_<YYYYMMDD-HHMMSS>` for the given time.
pub fn dir_name_for(timestamp: NaiveDateTime) -> String {
    format!(
        "{DIR_NAME_PREFIX}{}",
        timestamp.format(DIR_NAME_TIMESTAMP_FORMAT)
    )
}

fn archive_path_for(output_root: &Path, dir_name: &str) -> PathBuf {
    output_root.join(format!("{dir_name}.{ARCHIVE_EXTENSION}"))
}

fn unique_dir_name(output_root: &Path, started_at: NaiveDateTime) -> String {
    let mut timestamp = started_at;
    loop {
        let name = dir_name_for(timestamp);
        if !output_root.join(&name).exists() && !archive_path_for(output_root, &name).exists() {
            return name;
        }
        timestamp += Duration::seconds(1);
    }
}
