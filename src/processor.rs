use crate::domain::{MARKER_FILE, Outcome, RepoDescriptor, render_info};
use crate::ports::FileSystem;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Write the marker file into an existing folder
pub fn write_metadata(
    fs: &dyn FileSystem,
    folder: &Path,
    url: &str,
    description: Option<&str>,
) -> io::Result<()> {
    fs.write_file(&folder.join(MARKER_FILE), &render_info(url, description))
}

/// Materialize one repository, at most once.
///
/// The existence check and the create are not atomic. A concurrent creator of
/// the same folder makes `create_dir` fail, which is reported as `Failed`.
pub fn process_repository(fs: &dyn FileSystem, repo: &RepoDescriptor) -> Outcome {
    debug!("Processing: {}", repo.full_name);

    if repo.fork {
        debug!("Skipping fork: {}", repo.full_name);
        return Outcome::SkippedFork;
    }

    let folder_name = repo.folder_name();
    let folder = Path::new(&folder_name);
    if fs.exists(folder) {
        info!("Repository {} already processed, skipping...", repo.full_name);
        return Outcome::SkippedDuplicate;
    }

    let result = fs
        .create_dir(folder)
        .and_then(|()| write_metadata(fs, folder, &repo.html_url, repo.description.as_deref()));

    match result {
        Ok(()) => {
            info!("Successfully processed: {}", repo.full_name);
            Outcome::Created(repo.full_name.clone())
        }
        Err(e) => {
            warn!("Error processing repository {}: {}", repo.full_name, e);
            Outcome::Failed {
                full_name: repo.full_name.clone(),
                reason: e.to_string(),
            }
        }
    }
}
