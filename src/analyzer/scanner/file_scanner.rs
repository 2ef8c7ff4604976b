use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::analyzer::parser::Language;
use crate::constants::discovery::{MAX_FILE_SIZE, SKIPPED_DIRECTORIES};
use crate::types::SourceFile;

/// Discovers source files under a root directory.
///
/// Build, dependency and version-control directories are never entered.
/// Configured excluded paths accept either glob patterns matched against the
/// relative path (`**/Generated/**`) or bare directory names (`Migrations`,
/// `*/bin`).
pub struct WorkspaceScanner {
    root: PathBuf,
    excluded_paths: Vec<String>,
    extensions: Vec<String>,
    max_file_size: u64,
}

impl WorkspaceScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            excluded_paths: Vec::new(),
            extensions: Language::supported_extensions(),
            max_file_size: MAX_FILE_SIZE,
        }
    }

    pub fn with_excluded_paths(mut self, patterns: Vec<String>) -> Self {
        self.excluded_paths = patterns;
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read every supported source file, sorted by relative path.
    ///
    /// Oversized and unreadable files are skipped; unreadable ones are logged.
    pub fn scan(&self) -> Vec<SourceFile> {
        let mut files = Vec::new();

        for entry in self.walk() {
            let path = entry.path();
            let relative = self.relative_path(path);

            if !self.has_supported_extension(path) || self.is_excluded(&relative) {
                continue;
            }

            match path.metadata() {
                Ok(metadata) if metadata.len() > self.max_file_size => {
                    debug!(path = %relative, size = metadata.len(), "Skipping oversized file");
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %relative, error = %e, "Cannot stat file");
                    continue;
                }
            }

            match std::fs::read_to_string(path) {
                Ok(text) => files.push(
                    SourceFile::new(path.to_string_lossy(), text).with_relative_path(relative),
                ),
                Err(e) => warn!(path = %relative, error = %e, "Cannot read file"),
            }
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!(root = %self.root.display(), count = files.len(), "Workspace scan complete");
        files
    }

    /// Relative paths of every file in the tree regardless of extension,
    /// honoring the same directory exclusions as [`scan`](Self::scan).
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .walk()
            .map(|entry| self.relative_path(entry.path()))
            .filter(|relative| !self.is_excluded(relative))
            .collect();
        paths.sort();
        paths
    }

    fn walk(&self) -> impl Iterator<Item = DirEntry> {
        WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_directory(entry))
            .build()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .is_some_and(|ext| self.extensions.contains(&ext))
    }

    fn is_excluded(&self, relative: &str) -> bool {
        is_excluded_path(relative, &self.excluded_paths)
    }
}

fn is_skipped_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRECTORIES.contains(&name))
}

/// True when a relative file path falls under one of the excluded path
/// patterns.
///
/// A pattern is tried as a glob against the whole path first; otherwise its
/// `*` and `/` decorations are stripped and it is compared, case-insensitively,
/// against each directory component by containment.
pub fn is_excluded_path(relative: &str, patterns: &[String]) -> bool {
    let relative = relative.replace('\\', "/");
    let directories: Vec<String> = match relative.rsplit_once('/') {
        Some((dirs, _)) => dirs.split('/').map(str::to_lowercase).collect(),
        None => Vec::new(),
    };

    patterns.iter().any(|pattern| {
        let pattern = pattern.replace('\\', "/");
        if glob::Pattern::new(&pattern).is_ok_and(|p| p.matches(&relative)) {
            return true;
        }
        let name = pattern.trim_matches(['*', '/']).to_lowercase();
        !name.is_empty() && directories.iter().any(|dir| dir.contains(&name))
    })
}
