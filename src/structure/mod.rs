//! Structure Analyzer: folder/file classification and structural issues.
//!
//! Works on the walked tree only; it never looks at code facts.

pub mod rules;

use crate::cancellation::CancellationToken;
use crate::config::AnalyzerConfig;
use crate::core::{FileInfo, FolderInfo, StructureAnalysis};
use crate::errors::AnalysisError;
use crate::io::walker::{ProjectTree, ProjectWalker, WalkedEntry};
use rayon::prelude::*;
use rules::{standard_folder_ratio, TreeView, RULES};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct StructureAnalyzer<'a> {
    config: &'a AnalyzerConfig,
}

impl<'a> StructureAnalyzer<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Walk the asset root below `root` and analyze it.
    pub fn analyze(
        &self,
        root: &Path,
        token: &CancellationToken,
    ) -> Result<StructureAnalysis, AnalysisError> {
        let tree = ProjectWalker::new(root, &self.config.asset_root)
            .with_ignore_patterns(&self.config.ignore_patterns)
            .walk()?;
        token.check()?;
        Ok(self.analyze_walked(root, &tree))
    }

    /// [`analyze_tree`](Self::analyze_tree) plus the README lookup in `root`
    /// itself, which lies outside the walked asset root.
    pub fn analyze_walked(&self, root: &Path, tree: &ProjectTree) -> StructureAnalysis {
        let mut analysis = self.analyze_tree(tree);
        analysis.has_readme = analysis.has_readme || root_has_readme(root);
        analysis
    }

    /// Classify an already walked tree and run every rule over it.
    pub fn analyze_tree(&self, tree: &ProjectTree) -> StructureAnalysis {
        let config = self.config;
        let visible: Vec<&WalkedEntry> = tree
            .files
            .iter()
            .filter(|f| !config.extensions.is_ignored(&f.extension()))
            .collect();

        let files: Vec<FileInfo> = if config.parallel {
            visible.par_iter().map(|f| self.classify_file(f)).collect()
        } else {
            visible.iter().map(|f| self.classify_file(f)).collect()
        };
        let folders = self.classify_folders(&tree.folders, &files);

        let asset_root = PathBuf::from(&config.asset_root);
        let view = TreeView {
            asset_root: &asset_root,
            folders: &folders,
            files: &files,
        };
        let issues = RULES
            .iter()
            .flat_map(|rule| rule(&view, config))
            .collect::<Vec<_>>();
        let ratio = standard_folder_ratio(&view, config);

        let mut kind_counts = BTreeMap::new();
        for file in &files {
            *kind_counts.entry(file.kind).or_insert(0) += 1;
        }
        let has_readme = files.iter().any(|f| is_readme(&f.name));
        let total_size_bytes = files.iter().map(|f| f.size_bytes).sum();

        debug!(
            folders = folders.len(),
            files = files.len(),
            issues = issues.len(),
            "structure analyzed"
        );

        StructureAnalysis {
            folders,
            files,
            issues,
            kind_counts,
            total_size_bytes,
            standard_folder_ratio: ratio,
            follows_standard_structure: ratio >= config.thresholds.standard_structure_ratio,
            has_readme,
            warnings: tree.errors.clone(),
        }
    }

    fn classify_file(&self, entry: &WalkedEntry) -> FileInfo {
        let extension = entry.extension();
        FileInfo {
            path: entry.relative.clone(),
            name: entry.name(),
            kind: self.config.extensions.kind_for(&extension),
            extension,
            size_bytes: entry.size_bytes,
            depth: entry.depth(),
        }
    }

    fn classify_folders(&self, folders: &[WalkedEntry], files: &[FileInfo]) -> Vec<FolderInfo> {
        let mut direct_files: BTreeMap<&Path, usize> = BTreeMap::new();
        for file in files {
            if let Some(parent) = file.path.parent() {
                *direct_files.entry(parent).or_insert(0) += 1;
            }
        }
        folders
            .iter()
            .map(|entry| {
                let name = entry.name();
                FolderInfo {
                    path: entry.relative.clone(),
                    kind: self.config.catalog.folder_kind(&name),
                    name,
                    depth: entry.depth(),
                    file_count: direct_files
                        .get(entry.relative.as_path())
                        .copied()
                        .unwrap_or(0),
                }
            })
            .collect()
    }
}

fn is_readme(name: &str) -> bool {
    Path::new(name)
        .file_stem()
        .is_some_and(|stem| stem.eq_ignore_ascii_case("readme"))
}

fn root_has_readme(root: &Path) -> bool {
    std::fs::read_dir(root)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .any(|e| is_readme(&e.file_name().to_string_lossy()))
        })
        .unwrap_or(false)
}
