//! Staging and installation of generated trees.
//!
//! Installation replaces the destination with the staged tree, minus excluded
//! files. The default strategy builds the new tree next to the destination and
//! swaps it in with renames, so an interrupted install leaves either the old or
//! the new tree in place rather than a partially deleted one.

mod error;
mod exclude;
mod staging;

pub use error::{InstallError, InstallResult};
pub use exclude::ExcludeSet;
pub use staging::{StagingDir, validate_staging_name};

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const INCOMING_SUFFIX: &str = "genfix-incoming";
const PREVIOUS_SUFFIX: &str = "genfix-previous";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallStrategy {
    /// Stage beside the destination and swap with renames.
    #[default]
    Swap,
    /// Delete the destination, then copy the staged tree into it.
    RemoveThenCopy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub destination: Utf8PathBuf,
    pub files_installed: u64,
    pub files_excluded: u64,
    /// Strategy that actually completed. A swap may fall back to remove-then-copy.
    pub strategy: InstallStrategy,
}

/// Replace `destination` with the contents of `source`, skipping excluded entries.
pub fn install(
    source: &Utf8Path,
    destination: &Utf8Path,
    exclude: &ExcludeSet,
    strategy: InstallStrategy,
) -> InstallResult<InstallReport> {
    if !source.is_dir() {
        return Err(InstallError::SourceMissing(source.to_path_buf()));
    }

    let (incoming, previous) = sibling_paths(destination)?;
    remove_if_exists(&incoming)?;
    remove_if_exists(&previous)?;

    let report = match strategy {
        InstallStrategy::Swap => swap_install(
            source,
            destination,
            &incoming,
            &previous,
            exclude,
            &|from, to| fs::rename(from, to),
        )?,
        InstallStrategy::RemoveThenCopy => remove_then_copy(source, destination, exclude)?,
    };

    info!(
        destination = %destination,
        files = report.files_installed,
        excluded = report.files_excluded,
        strategy = ?report.strategy,
        "installed generated tree"
    );
    Ok(report)
}

fn swap_install(
    source: &Utf8Path,
    destination: &Utf8Path,
    incoming: &Utf8Path,
    previous: &Utf8Path,
    exclude: &ExcludeSet,
    rename: &dyn Fn(&Utf8Path, &Utf8Path) -> std::io::Result<()>,
) -> InstallResult<InstallReport> {
    let counts = copy_filtered(source, incoming, exclude)?;

    let had_previous = destination.exists();
    if had_previous {
        if let Err(err) = rename(destination, previous) {
            warn!(error = %err, "cannot move destination aside; falling back to remove-then-copy");
            remove_if_exists(incoming)?;
            return remove_then_copy(source, destination, exclude);
        }
    }

    if let Err(err) = rename(incoming, destination) {
        warn!(error = %err, "cannot rename staged tree into place; falling back to remove-then-copy");
        if had_previous {
            rename(previous, destination)?;
        }
        remove_if_exists(incoming)?;
        return remove_then_copy(source, destination, exclude);
    }

    if had_previous {
        if let Err(err) = fs::remove_dir_all(previous) {
            warn!(path = %previous, error = %err, "failed to remove previous tree");
        }
    }

    Ok(InstallReport {
        destination: destination.to_path_buf(),
        files_installed: counts.installed,
        files_excluded: counts.excluded,
        strategy: InstallStrategy::Swap,
    })
}

fn remove_then_copy(
    source: &Utf8Path,
    destination: &Utf8Path,
    exclude: &ExcludeSet,
) -> InstallResult<InstallReport> {
    remove_if_exists(destination)?;
    let counts = copy_filtered(source, destination, exclude)?;
    Ok(InstallReport {
        destination: destination.to_path_buf(),
        files_installed: counts.installed,
        files_excluded: counts.excluded,
        strategy: InstallStrategy::RemoveThenCopy,
    })
}

#[derive(Debug, Default)]
struct CopyCounts {
    installed: u64,
    excluded: u64,
}

fn copy_filtered(
    source: &Utf8Path,
    target: &Utf8Path,
    exclude: &ExcludeSet,
) -> InstallResult<CopyCounts> {
    let mut counts = CopyCounts::default();
    fs::create_dir_all(target)?;

    let mut walker = WalkDir::new(source).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|source_err| InstallError::Walk {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let path = Utf8Path::from_path(entry.path())
            .ok_or_else(|| InstallError::NonUtf8Path(source.to_path_buf()))?;
        let rel = match path.strip_prefix(source) {
            Ok(rel) if !rel.as_str().is_empty() => rel,
            _ => continue,
        };
        let rel_str = rel.as_str().replace('\\', "/");

        if exclude.matches(&rel_str) {
            debug!(path = %rel_str, "excluded from install");
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            } else {
                counts.excluded += 1;
            }
            continue;
        }

        let dest = target.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(path, &dest)?;
            counts.installed += 1;
        }
    }

    Ok(counts)
}

fn sibling_paths(destination: &Utf8Path) -> InstallResult<(Utf8PathBuf, Utf8PathBuf)> {
    let name = destination
        .file_name()
        .ok_or_else(|| InstallError::InvalidDestination(destination.to_path_buf()))?;
    let parent = match destination.parent() {
        Some(p) if !p.as_str().is_empty() => p.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;
    Ok((
        parent.join(format!(".{name}.{INCOMING_SUFFIX}")),
        parent.join(format!(".{name}.{PREVIOUS_SUFFIX}")),
    ))
}

fn remove_if_exists(path: &Utf8Path) -> InstallResult<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path)?,
        Ok(_) => fs::remove_file(path)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
