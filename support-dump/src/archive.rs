use crate::{
    config::DumpConfig,
    constants::{MAX_ARCHIVE_EMAIL_SIZE, SUPPORT_EMAIL},
    error::{CreateArchive, Result},
    utils::joined_flatten,
};
use byte_unit::Byte;
use flate2::{write::GzEncoder, Compression};
use snafu::ResultExt;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

const RULE: &str = "------------------------------------------------------------------------";

/// Write `work_dir` into a gzip compressed tarball at `archive_path`, with `root_name` as the
/// top level entry.
pub fn create_archive(work_dir: &Path, root_name: &str, archive_path: &Path) -> Result<()> {
    let context = || CreateArchive {
        path: archive_path.to_path_buf(),
    };

    let file = File::create(archive_path).with_context(|_| context())?;
    let mut tar = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    tar.append_dir_all(root_name, work_dir)
        .with_context(|_| context())?;
    tar.into_inner()
        .and_then(|encoder| encoder.finish())
        .with_context(|_| context())?;
    Ok(())
}

/// Archive the run directory off the async runtime. The run directory is left in place.
pub async fn archive_dump(config: &DumpConfig) -> Result<PathBuf> {
    let work_dir = config.work_dir();
    let root_name = config.dir_name().to_string();
    let archive_path = config.archive_path();

    let path = archive_path.clone();
    joined_flatten(tokio::task::spawn_blocking(move || {
        create_archive(&work_dir, &root_name, &path)
    }))
    .await?;

    info!("Archive file : {}", archive_path.display());
    Ok(archive_path)
}

/// How the archive should reach support, decided by its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveSize {
    /// Small enough to attach to an email.
    Emailable(u64),
    /// Needs a file share link.
    TooLarge(u64),
    /// The size could not be read.
    Unknown,
}

impl ArchiveSize {
    pub fn from_bytes(bytes: u64) -> Self {
        if bytes >= MAX_ARCHIVE_EMAIL_SIZE {
            Self::TooLarge(bytes)
        } else {
            Self::Emailable(bytes)
        }
    }

    /// Guidance lines shown to the operator.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Emailable(bytes) => vec![
                format!(
                    "Archive file size (bytes): {bytes} ({})",
                    Byte::from_bytes(u128::from(*bytes)).get_appropriate_unit(true)
                ),
                format!("Email the support dump to {SUPPORT_EMAIL}"),
            ],
            Self::TooLarge(bytes) => vec![
                format!(
                    "Archive file ({}) may be too big to email.",
                    Byte::from_bytes(u128::from(*bytes)).get_appropriate_unit(true)
                ),
                format!("Please request file share link by emailing {SUPPORT_EMAIL}"),
            ],
            Self::Unknown => vec!["Archive file size: NA".to_string()],
        }
    }
}

/// Read the archive size and log where to send it. A failure to read the size is only logged.
pub async fn report_archive_size(archive_path: &Path) -> ArchiveSize {
    let size = match tokio::fs::metadata(archive_path).await {
        Ok(metadata) => ArchiveSize::from_bytes(metadata.len()),
        Err(error) => {
            warn!(path = %archive_path.display(), %error, "Failed to read archive size");
            ArchiveSize::Unknown
        }
    };

    match size {
        ArchiveSize::Unknown => {
            for line in size.messages() {
                warn!("{line}");
            }
        }
        _ => {
            info!("{RULE}");
            for line in size.messages() {
                info!("{line}");
            }
            info!("{RULE}");
        }
    }
    size
}
