//! Directory walking for the project tree.

use crate::errors::AnalysisError;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// One entry found below the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    /// Path relative to the project root
    pub relative: PathBuf,
    pub absolute: PathBuf,
    pub size_bytes: u64,
}

impl WalkedEntry {
    /// Number of path components below the project root.
    pub fn depth(&self) -> usize {
        self.relative.components().count()
    }

    pub fn name(&self) -> String {
        self.relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn extension(&self) -> String {
        self.relative
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Folders and files below a walk root, each sorted by relative path.
#[derive(Debug, Clone, Default)]
pub struct ProjectTree {
    pub folders: Vec<WalkedEntry>,
    pub files: Vec<WalkedEntry>,
    /// Entries that could not be read
    pub errors: Vec<String>,
}

impl ProjectTree {
    pub fn files_with_extension<'a>(
        &'a self,
        extensions: &'a [String],
    ) -> impl Iterator<Item = &'a WalkedEntry> {
        self.files.iter().filter(move |f| {
            let ext = f.extension();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
    }
}

pub struct ProjectWalker {
    project_root: PathBuf,
    walk_root: PathBuf,
    ignore_patterns: Vec<glob::Pattern>,
}

impl ProjectWalker {
    /// Walk `project_root/subdir`, reporting paths relative to `project_root`.
    pub fn new(project_root: impl Into<PathBuf>, subdir: impl AsRef<Path>) -> Self {
        let project_root = project_root.into();
        let walk_root = project_root.join(subdir);
        Self {
            project_root,
            walk_root,
            ignore_patterns: Vec::new(),
        }
    }

    /// Invalid patterns are logged and skipped.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "ignoring invalid ignore pattern");
                    None
                }
            })
            .collect();
        self
    }

    /// Collect the tree. Fails only when the walk root itself is unreadable.
    pub fn walk(&self) -> Result<ProjectTree, AnalysisError> {
        if !self.walk_root.is_dir() {
            return Err(AnalysisError::io_with_path(
                "directory does not exist",
                &self.walk_root,
            ));
        }

        let mut tree = ProjectTree::default();
        let walker = WalkDir::new(&self.walk_root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_ignored(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "unreadable entry");
                    tree.errors.push(e.to_string());
                    continue;
                }
            };
            let absolute = entry.path().to_path_buf();
            let relative = self.relative(&absolute);
            let file_type = entry.file_type();
            if file_type.is_dir() {
                tree.folders.push(WalkedEntry {
                    relative,
                    absolute,
                    size_bytes: 0,
                });
            } else if file_type.is_file() {
                let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or_else(|e| {
                    tree.errors.push(e.to_string());
                    0
                });
                tree.files.push(WalkedEntry {
                    relative,
                    absolute,
                    size_bytes,
                });
            }
        }

        tree.folders.sort_by(|a, b| a.relative.cmp(&b.relative));
        tree.files.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(tree)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        pathdiff::diff_paths(path, &self.project_root).unwrap_or_else(|| path.to_path_buf())
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if self.ignore_patterns.is_empty() || path == self.walk_root {
            return false;
        }
        let relative = self.relative(path);
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(&relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, bytes: usize) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![b'x'; bytes]).unwrap();
    }

    #[test]
    fn test_walk_is_sorted_and_relative() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Assets/Scripts/B.cs", 3);
        touch(dir.path(), "Assets/Scripts/A.cs", 5);
        touch(dir.path(), "Assets/Scenes/Main.unity", 1);

        let tree = ProjectWalker::new(dir.path(), "Assets").walk().unwrap();
        let files: Vec<_> = tree.files.iter().map(|f| f.relative.clone()).collect();
        assert_eq!(
            files,
            vec![
                PathBuf::from("Assets/Scenes/Main.unity"),
                PathBuf::from("Assets/Scripts/A.cs"),
                PathBuf::from("Assets/Scripts/B.cs"),
            ]
        );
        assert_eq!(tree.files[1].size_bytes, 5);
        assert_eq!(tree.files[1].depth(), 3);
        assert_eq!(tree.folders.len(), 2);
    }

    #[test]
    fn test_ignore_patterns_prune_subtrees() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Assets/Scripts/A.cs", 1);
        touch(dir.path(), "Assets/.hidden/B.cs", 1);
        touch(dir.path(), "Assets/Samples~/C.cs", 1);

        let patterns = vec![
            "**/.*".to_string(),
            "**/*~".to_string(),
        ];
        let tree = ProjectWalker::new(dir.path(), "Assets")
            .with_ignore_patterns(&patterns)
            .walk()
            .unwrap();
        assert_eq!(tree.files.len(), 1);
        assert_eq!(tree.files[0].name(), "A.cs");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ProjectWalker::new(dir.path(), "Assets").walk();
        assert_eq!(result.unwrap_err().category(), "I/O");
    }

    #[test]
    fn test_extension_filter() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Assets/A.CS", 1);
        touch(dir.path(), "Assets/b.png", 1);
        let tree = ProjectWalker::new(dir.path(), "Assets").walk().unwrap();
        let sources = vec!["cs".to_string()];
        assert_eq!(tree.files_with_extension(&sources).count(), 1);
        assert_eq!(tree.files[0].extension(), "cs");
    }
}
