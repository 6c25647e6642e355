/// Title of the console banner.
pub const BANNER_TITLE: &str = "Crunchy support dump collector";
/// What the dump holds, shown in the console banner.
pub const BANNER_NOTE: &str = "NOTE: We gather metadata and pod logs only. (No data and k8s secrets)";
/// Log filter used when RUST_LOG is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";
/// Log filter used with `--verbose` when RUST_LOG is not set.
pub const VERBOSE_LOG_FILTER: &str = "debug";

/// Process exit codes.
pub mod codes {
    /// The support dump was archived.
    pub const SUCCESS: i32 = 0;
    /// Neither `oc` nor `kubectl` is on the PATH.
    pub const CLI_NOT_FOUND: i32 = 2;
    /// The cluster could not be reached with the resolved CLI.
    pub const CLUSTER_UNREACHABLE: i32 = 3;
    /// The arguments were rejected.
    pub const INVALID_ARGS: i32 = 4;
    /// The run directory or the archive could not be written.
    pub const IO_ERROR: i32 = 5;
}
