use snafu::Snafu;
use std::path::PathBuf;

/// Errors which stop a support dump. Failures of individual collection steps are not errors,
/// they are recorded as skipped steps in the [`crate::collect::DumpReport`].
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub))]
pub enum Error {
    /// Error when neither of the supported kubernetes CLIs is on the PATH.
    #[snafu(display("kubernetes CLI not found, install 'oc' or 'kubectl' and add it to PATH"))]
    KubeCliNotFound,

    /// Error when the access probe of the resolved CLI exits with a failure.
    #[snafu(display("Not connected to kubernetes cluster, '{command}' failed: {output}"))]
    ClusterUnreachable { command: String, output: String },

    /// Error when an empty namespace is supplied.
    #[snafu(display("The namespace must not be empty"))]
    EmptyNamespace,

    /// Error for when the run directory could not be created.
    #[snafu(display("Failed to create directory '{}': {source}", path.display()))]
    CreateDirectory {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error for when a command could not be launched at all.
    #[snafu(display("Failed to run command '{command}': {source}"))]
    CommandSpawn {
        source: std::io::Error,
        command: String,
    },

    /// Error for when collected output could not be written to disk.
    #[snafu(display("Failed to write '{}': {source}", path.display()))]
    WriteArtifact {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error for when the gzip tarball could not be written.
    #[snafu(display("Failed to create archive '{}': {source}", path.display()))]
    CreateArchive {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error for when the blocking archive task panicked or was cancelled.
    #[snafu(display("Archive task failed to complete: {source}"))]
    ArchiveTask { source: tokio::task::JoinError },
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub type Result<T, E = Error> = std::result::Result<T, E>;
