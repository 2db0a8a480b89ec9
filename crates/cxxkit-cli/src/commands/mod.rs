//! The three cxxkit subcommands.

pub mod build;
pub mod format;
pub mod lint;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use cxxkit_walk::{LocalFs, SourceWalker};
use tracing::warn;

/// Walk the project tree for files matching the given extension suffixes,
/// pruning the configured directory names. Unreadable directories are logged
/// and skipped.
pub(crate) async fn discover_sources(
    root: &Path,
    extensions: &[String],
    exclude_dirs: &[String],
) -> Vec<PathBuf> {
    let extensions: Vec<&str> = extensions.iter().map(String::as_str).collect();
    let exclude_dirs: Vec<&str> = exclude_dirs.iter().map(String::as_str).collect();

    SourceWalker::new(&LocalFs, root)
        .extensions(&extensions)
        .exclude_dirs(&exclude_dirs)
        .on_error(Arc::new(|path, err| {
            warn!(path = %path.display(), %err, "skipping unreadable directory");
        }))
        .collect()
        .await
}

/// Map a child's exit code to this process's exit code, clamping anything
/// unrepresentable (or zero, which cannot be a failure code) to 1.
pub(crate) fn propagate_exit(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(0) | Err(_) => ExitCode::from(1),
        Ok(code) => ExitCode::from(code),
    }
}
