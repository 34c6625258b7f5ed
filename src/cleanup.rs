use crate::domain::MARKER_FILE;
use crate::error::CleanupError;
use crate::ports::FileSystem;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Folder names are kept as raw paths so non-UTF-8 names survive the sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Folder name and reason for every removal that failed
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    /// Removed folder names, lossily converted for display
    pub fn removed_names(&self) -> Vec<String> {
        self.removed
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }
}

/// Remove every child of the working directory that carries the marker file.
///
/// Directories without the marker are never touched. A failed removal is
/// recorded and the sweep moves on.
pub fn sweep(fs: &dyn FileSystem) -> Result<CleanupReport, CleanupError> {
    let names = fs.list_dir().map_err(|source| CleanupError {
        path: fs.root().to_path_buf(),
        source,
    })?;

    let mut report = CleanupReport::default();
    for name in names {
        let folder = PathBuf::from(name);
        if !fs.is_dir(&folder) || !fs.exists(&folder.join(MARKER_FILE)) {
            debug!("Leaving {} in place", folder.display());
            continue;
        }

        match fs.remove_dir_all(&folder) {
            Ok(()) => {
                info!("Removed folder: {}", folder.display());
                report.removed.push(folder);
            }
            Err(e) => {
                warn!("Error removing folder {}: {}", folder.display(), e);
                report.failed.push((folder, e.to_string()));
            }
        }
    }

    info!(
        "Cleanup removed {} folders ({} failed)",
        report.removed.len(),
        report.failed.len()
    );
    Ok(report)
}
