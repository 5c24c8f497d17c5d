/// Open a directory in the desktop's file manager.
///
/// The path is handed to the platform opener (`xdg-open` on Linux) as a
/// detached process. Nothing comes back beyond whether the spawn worked.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("path does not exist: {0}")]
    Missing(PathBuf),

    #[error("failed to open {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn open_in_file_manager(path: &Path) -> Result<(), OpenError> {
    if !path.exists() {
        return Err(OpenError::Missing(path.to_path_buf()));
    }
    info!("Opening {}", path.display());
    open::that_detached(path).map_err(|source| OpenError::Launch {
        path: path.to_path_buf(),
        source,
    })
}
