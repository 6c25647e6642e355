use crate::constants::{codes, DEFAULT_LOG_FILTER, VERBOSE_LOG_FILTER};
use support_dump::Error;
use tracing_subscriber::EnvFilter;

pub mod supportability;

/// Send log lines to stdout. RUST_LOG wins over the `--verbose` flag.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();
}

/// Map a failed run to the process exit code.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<Error>() {
        Some(Error::KubeCliNotFound) => codes::CLI_NOT_FOUND,
        // Collectors never surface launch failures, only the access probe does.
        Some(Error::ClusterUnreachable { .. } | Error::CommandSpawn { .. }) => {
            codes::CLUSTER_UNREACHABLE
        }
        Some(Error::EmptyNamespace) => codes::INVALID_ARGS,
        Some(
            Error::CreateDirectory { .. }
            | Error::WriteArtifact { .. }
            | Error::CreateArchive { .. }
            | Error::ArchiveTask { .. },
        )
        | None => codes::IO_ERROR,
    }
}
