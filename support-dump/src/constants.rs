/// Prefix of the run directory name, the timestamp is appended to it.
pub const DIR_NAME_PREFIX: &str = "crunchy_k8s_support_dump_";
/// `chrono` format of the timestamp suffix of the run directory name.
pub const DIR_NAME_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
/// Extension appended to the run directory path to name the archive.
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// Archives at or above this size should not be sent by email.
pub const MAX_ARCHIVE_EMAIL_SIZE: u64 = 25 * 1024 * 1024;
/// Where support dumps are sent.
pub const SUPPORT_EMAIL: &str = "support@crunchydata.com";

/// Label selector matching every pod of the product.
pub const VENDOR_LABEL_SELECTOR: &str = "vendor=crunchydata";
/// Label selector matching the database pods of the product.
pub const PG_DATABASE_LABEL_SELECTOR: &str = "pgo-pg-database=true,vendor=crunchydata";

/// Kinds fetched with `get <kind> -o yaml`, one file per kind.
pub const API_RESOURCES: [&str; 13] = [
    "pods",
    "ReplicaSet",
    "Deployment",
    "Services",
    "Routes",
    "Ingress",
    "NetworkPolicies",
    "pvc",
    "configmap",
    "pgreplicas",
    "pgclusters",
    "pgpolicies",
    "pgtasks",
];
/// Kinds which only exist on OpenShift.
pub const OPENSHIFT_ONLY_RESOURCES: [&str; 1] = ["Routes"];

/// Name of the container running postgres in a database pod.
pub const DATABASE_CONTAINER: &str = "database";
/// Shell used to run the diagnostic commands inside a container.
pub const CONTAINER_SHELL: &str = "/bin/bash";
/// Diagnostic commands run in every container of a database pod.
pub const GENERIC_DIAGNOSTIC_COMMANDS: [&str; 3] = ["ps aux --width 500", "df -h", "env"];
/// Diagnostic commands run in the database container only.
pub const DATABASE_DIAGNOSTIC_COMMANDS: [&str; 2] = ["patronictl list", "patronictl history"];

/// Glob of the rotated postgres log directories inside the database container.
pub const PG_LOG_GLOB: &str = "/pgdata/*/pg_log/*";
/// The default number of postgres log directories copied per pod.
pub const DEFAULT_PG_LOG_LIMIT: usize = 2;

/// Run directory sub-folder holding container logs.
pub const POD_LOGS_DIR: &str = "pod_logs";
/// Run directory sub-folder holding the diagnostic command output.
pub const PG_POD_DETAILS_DIR: &str = "pg_pod_details";
/// Run directory sub-folder holding the copied postgres logs.
pub const PG_LOGS_DIR: &str = "pg_logs";
