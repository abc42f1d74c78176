//! Workspace directory operations for a single build.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The working directory a build runs in.
///
/// All build inputs and tool result directories live under this root;
/// request paths are resolved against it.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a build-relative path against the workspace root.
    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Create a workspace subdirectory if it does not exist yet.
    pub fn ensure_dir(&self, rel: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = self.join(rel);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        Ok(dir)
    }

    /// List the files directly under a workspace subdirectory.
    ///
    /// Non-recursive; the order is whatever the platform's directory
    /// listing returns. Errors if the directory does not exist.
    pub fn list_files(&self, rel: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = self.join(rel);
        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry =
                entry.with_context(|| format!("Failed to list directory {}", dir.display()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
