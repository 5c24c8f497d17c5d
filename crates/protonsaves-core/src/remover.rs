/// Prefix removal: recursive, irreversible deletion of `compatdata/<id>`.
///
/// This module performs no confirmation. Callers must obtain an explicit
/// "yes" from the user naming the prefix id before calling in here.
///
/// The whole `<id>` directory goes, not just `pfx`: Proton keeps
/// `pfx.lock`, `version`, `tracked_files` and friends beside it.
/// A failure part-way leaves whatever was not yet removed; there is no
/// retry or rollback, the error is returned for the user to see.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RemoveError {
    #[error("prefix does not exist: {0}")]
    NotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("refusing to delete through a symlink: {0}")]
    SymlinkRoot(PathBuf),

    #[error("refusing to delete {path}: not a prefix directly inside {base}")]
    OutsideBase { path: PathBuf, base: PathBuf },

    #[error("failed to delete {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Recursively delete the prefix directory at `prefix_path`.
pub fn remove_prefix(prefix_path: &Path) -> Result<(), RemoveError> {
    // symlink_metadata: look at the entry itself, never its target.
    let meta = match fs::symlink_metadata(prefix_path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(RemoveError::NotFound(prefix_path.to_path_buf()))
        }
        Err(source) => {
            return Err(RemoveError::Io {
                path: prefix_path.to_path_buf(),
                source,
            })
        }
    };

    if meta.file_type().is_symlink() {
        return Err(RemoveError::SymlinkRoot(prefix_path.to_path_buf()));
    }
    if !meta.is_dir() {
        return Err(RemoveError::NotADirectory(prefix_path.to_path_buf()));
    }

    info!("Deleting prefix {}", prefix_path.display());
    fs::remove_dir_all(prefix_path).map_err(|source| {
        warn!("Delete of {} failed: {}", prefix_path.display(), source);
        RemoveError::Io {
            path: prefix_path.to_path_buf(),
            source,
        }
    })?;
    info!("Deleted prefix {}", prefix_path.display());
    Ok(())
}

/// Like [`remove_prefix`], but only for a direct child of `base`.
///
/// Guards against a stale or crafted path escaping the compatdata tree.
pub fn remove_prefix_in(base: &Path, prefix_path: &Path) -> Result<(), RemoveError> {
    let is_child = prefix_path.parent() == Some(base)
        && prefix_path
            .file_name()
            .is_some_and(|n| n != "." && n != "..");
    if !is_child {
        return Err(RemoveError::OutsideBase {
            path: prefix_path.to_path_buf(),
            base: base.to_path_buf(),
        });
    }
    remove_prefix(prefix_path)
}
