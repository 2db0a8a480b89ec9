//! cxxkit-walk: source-file discovery for the cxxkit tools.
//!
//! Provides:
//! - **WalkFs**: minimal read-only filesystem trait the walker runs against
//! - **SourceWalker**: recursive walker that collects files by extension
//!   suffix while pruning excluded directory names
//! - **LocalFs**: the real-filesystem implementation
//!
//! The walker is generic over `WalkFs` so discovery can be tested against an
//! in-memory filesystem. For a fixed filesystem state the result is a stable
//! sorted set: entries are visited in sorted order per directory and the
//! collected paths are sorted once more before being returned.

mod local;
mod walker;

pub use local::{LocalEntry, LocalFs};
pub use walker::{ErrorCallback, SourceWalker};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from filesystem operations during a walk.
///
/// None of these abort a walk; unreadable directories are skipped and
/// optionally surfaced through the walker's error callback.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Minimal read-only filesystem abstraction for the walker.
///
/// Implement this to run discovery against something other than the real
/// filesystem (tests use an in-memory tree).
#[async_trait]
pub trait WalkFs: Send + Sync {
    /// The directory entry type returned by `list_dir`.
    type DirEntry: WalkDirEntry;

    /// List the entries in a directory.
    async fn list_dir(&self, path: &Path) -> Result<Vec<Self::DirEntry>, WalkError>;
}

/// A single entry returned by `WalkFs::list_dir`.
pub trait WalkDirEntry: Send {
    /// The entry name (file or directory name, not full path).
    fn name(&self) -> &str;

    /// True if this entry is a directory.
    fn is_dir(&self) -> bool;

    /// True if this entry is a symbolic link.
    fn is_symlink(&self) -> bool;
}
