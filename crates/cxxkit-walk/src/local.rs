//! `WalkFs` backed by the real filesystem via tokio.

use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::{WalkDirEntry, WalkError, WalkFs};

/// The real-filesystem implementation of `WalkFs`.
pub struct LocalFs;

/// A directory entry read from the local filesystem.
///
/// File-type information is captured eagerly at listing time;
/// `is_symlink` reflects the link itself, not its target.
pub struct LocalEntry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

impl WalkDirEntry for LocalEntry {
    fn name(&self) -> &str {
        &self.name
    }
    fn is_dir(&self) -> bool {
        self.is_dir
    }
    fn is_symlink(&self) -> bool {
        self.is_symlink
    }
}

fn map_io_error(path: &Path, err: io::Error) -> WalkError {
    match err.kind() {
        io::ErrorKind::NotFound => WalkError::NotFound(path.display().to_string()),
        io::ErrorKind::PermissionDenied => {
            WalkError::PermissionDenied(path.display().to_string())
        }
        _ => WalkError::Io(format!("{}: {}", path.display(), err)),
    }
}

#[async_trait]
impl WalkFs for LocalFs {
    type DirEntry = LocalEntry;

    async fn list_dir(&self, path: &Path) -> Result<Vec<LocalEntry>, WalkError> {
        let mut read_dir = tokio::fs::read_dir(path)
            .await
            .map_err(|e| map_io_error(path, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| map_io_error(path, e))?
        {
            let file_type = match entry.file_type().await {
                Ok(ft) => ft,
                // Entry vanished between listing and stat; skip it.
                Err(_) => continue,
            };
            let is_symlink = file_type.is_symlink();
            // For symlinks, report whether the target is a directory so the
            // walker can decide not to descend into it.
            let is_dir = if is_symlink {
                tokio::fs::metadata(entry.path())
                    .await
                    .map(|m| m.is_dir())
                    .unwrap_or(false)
            } else {
                file_type.is_dir()
            };
            entries.push(LocalEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
                is_symlink,
            });
        }

        Ok(entries)
    }
}
