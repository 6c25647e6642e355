use clap::builder::NonEmptyStringValueParser;
use std::path::PathBuf;
use support_dump::constants::DEFAULT_PG_LOG_LIMIT;

pub mod dump;

/// Collects kubernetes objects, pod logs and other metadata of the Crunchy Data containers
/// running in a namespace and dumps them to a tar file. Secrets and data are not collected.
#[derive(Debug, Clone, clap::Args)]
pub struct DumpArgs {
    /// Kubernetes namespace or OpenShift project to create the support dump for.
    #[clap(long, short = 'n', required = true, value_parser = NonEmptyStringValueParser::new())]
    namespace: String,

    /// Directory to create the support dump in.
    #[clap(long = "output-dir", short = 'o', alias = "output_dir", required = true)]
    output_dir: PathBuf,

    /// Number of the most recent postgres log directories copied from each database pod.
    #[clap(long, default_value_t = DEFAULT_PG_LOG_LIMIT)]
    pg_log_limit: usize,
}

impl DumpArgs {
    /// Returns the namespace to collect from.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the directory the run directory and archive are created in.
    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    /// Returns the per pod limit of copied postgres log directories.
    pub fn pg_log_limit(&self) -> usize {
        self.pg_log_limit
    }
}
