//! Recursive source-file walker, generic over `WalkFs`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{WalkDirEntry, WalkError, WalkFs};

/// Callback invoked when a directory cannot be read during a walk.
///
/// Receives the path where the error occurred and the error itself, so
/// callers can log or collect errors without aborting the walk.
pub type ErrorCallback = Arc<dyn Fn(&Path, &WalkError) + Send + Sync>;

/// Recursive walker that collects files matching extension suffixes while
/// pruning excluded directory names.
///
/// Exclusion is by path segment: a directory whose name appears in the
/// excluded set is never descended into, so no collected path contains an
/// excluded segment anywhere in its chain. Symlinked directories are not
/// followed.
///
/// # Examples
/// ```ignore
/// let walker = SourceWalker::new(&LocalFs, project_root)
///     .extensions(&[".h", ".hpp", ".cc", ".cpp", ".cxx"])
///     .exclude_dirs(&["build", "vcpkg_installed", ".cache", ".git"]);
/// let files = walker.collect().await;
/// ```
pub struct SourceWalker<'a, F: WalkFs> {
    fs: &'a F,
    root: PathBuf,
    extensions: Vec<String>,
    excluded: BTreeSet<String>,
    on_error: Option<ErrorCallback>,
}

impl<'a, F: WalkFs> SourceWalker<'a, F> {
    /// Create a new walker rooted at the given directory.
    pub fn new(fs: &'a F, root: impl AsRef<Path>) -> Self {
        Self {
            fs,
            root: root.as_ref().to_path_buf(),
            extensions: Vec::new(),
            excluded: BTreeSet::new(),
            on_error: None,
        }
    }

    /// Set the extension suffixes to match (including the leading dot).
    ///
    /// A file matches when its name ends with any of the suffixes. An empty
    /// list matches nothing.
    pub fn extensions(mut self, exts: &[&str]) -> Self {
        self.extensions = exts.iter().map(|e| e.to_string()).collect();
        self
    }

    /// Set the directory names to prune from the walk.
    pub fn exclude_dirs(mut self, names: &[&str]) -> Self {
        self.excluded = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Install a callback for unreadable directories.
    pub fn on_error(mut self, cb: ErrorCallback) -> Self {
        self.on_error = Some(cb);
        self
    }

    /// Walk the tree and return the sorted set of matching file paths.
    ///
    /// An empty result is not an error. Paths are returned under the walker's
    /// root; pass an absolute root to get absolute results.
    pub async fn collect(self) -> Vec<PathBuf> {
        let mut results = Vec::new();
        let mut stack = vec![self.root.clone()];

        while let Some(dir) = stack.pop() {
            let entries = match self.fs.list_dir(&dir).await {
                Ok(entries) => entries,
                Err(err) => {
                    if let Some(ref cb) = self.on_error {
                        cb(&dir, &err);
                    }
                    continue;
                }
            };

            let mut entries: Vec<_> = entries
                .into_iter()
                .map(|e| (e.name().to_string(), e.is_dir(), e.is_symlink()))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            // Push subdirectories in reverse so alphabetically-first ones are
            // popped first from the LIFO stack.
            let mut dirs_to_push = Vec::new();

            for (name, is_dir, is_symlink) in entries {
                let full_path = dir.join(&name);

                if is_dir {
                    if self.excluded.contains(&name) {
                        continue;
                    }
                    // Symlinked directories are never followed.
                    if is_symlink {
                        continue;
                    }
                    dirs_to_push.push(full_path);
                } else if self.matches_extension(&name) {
                    results.push(full_path);
                }
            }

            dirs_to_push.reverse();
            stack.extend(dirs_to_push);
        }

        results.sort();
        results
    }

    fn matches_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}
