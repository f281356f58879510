use crate::error::{InstallError, InstallResult};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::{debug, warn};

/// A per-target scratch directory that is cleared on creation and removed on drop.
///
/// Dropping removes it on success and on failure alike; `keep` leaves it in place
/// for inspection.
#[derive(Debug)]
pub struct StagingDir {
    path: Utf8PathBuf,
    keep: bool,
}

impl StagingDir {
    /// Create `<root>/<name>`, deleting whatever a previous run left there.
    ///
    /// `name` must be a single normal path component, so the directory that gets
    /// cleared is always a direct child of `root`.
    pub fn create(root: &Utf8Path, name: &str, keep: bool) -> InstallResult<Self> {
        validate_staging_name(name)?;
        let path = root.join(name);
        if path.parent() != Some(root) {
            return Err(InstallError::InvalidStagingName(name.to_string()));
        }
        if path.exists() {
            debug!(path = %path, "clearing previous staging directory");
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        Ok(Self { path, keep })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn join(&self, rel: impl AsRef<Utf8Path>) -> Utf8PathBuf {
        self.path.join(rel)
    }

    pub fn keep(&self) -> bool {
        self.keep
    }
}

/// Reject names that are empty, `.`/`..`, or contain a path separator.
pub fn validate_staging_name(name: &str) -> InstallResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || Utf8Path::new(name).is_absolute();
    if invalid {
        return Err(InstallError::InvalidStagingName(name.to_string()));
    }
    Ok(())
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if self.keep {
            debug!(path = %self.path, "keeping staging directory");
            return;
        }
        if let Err(err) = fs::remove_dir_all(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path, error = %err, "failed to remove staging directory");
            }
        }
    }
}
