//! Asset inventory and manifest checks.
//!
//! Assets are classified by extension only. Module manifests (`.asmdef`)
//! and `Packages/manifest.json` are the only contents read.

pub mod manifest;

use crate::cancellation::CancellationToken;
use crate::core::{AssetAnalysis, AssetEntry, AssetKindSummary, FileInfo, FileKind};
use crate::errors::AnalysisError;
use manifest::{module_conflicts, read_assembly_definition, read_package_manifest};
use std::path::Path;
use tracing::{debug, warn};

/// Number of entries kept in [`AssetAnalysis::largest_assets`].
pub const LARGEST_ASSET_COUNT: usize = 10;

pub struct AssetAnalyzer;

impl AssetAnalyzer {
    /// Inventory `files` (relative to `root`) and read their manifests.
    pub fn analyze(
        root: &Path,
        files: &[FileInfo],
        token: &CancellationToken,
    ) -> Result<AssetAnalysis, AnalysisError> {
        let mut analysis = inventory(files);
        token.check()?;

        let mut modules = Vec::new();
        let mut manifests_readable = true;
        for file in files.iter().filter(|f| f.kind == FileKind::ModuleManifest) {
            match read_assembly_definition(&root.join(&file.path), &file.path) {
                Ok(module) => modules.push(module),
                Err(e) => {
                    warn!(error = %e, "skipping module conflict check");
                    analysis.warnings.push(e.to_string());
                    manifests_readable = false;
                }
            }
        }
        modules.sort_by(|a, b| (&a.name, &a.path).cmp(&(&b.name, &b.path)));
        analysis.module_conflicts = manifests_readable.then(|| module_conflicts(&modules));
        analysis.assembly_definitions = modules;

        analysis.packages = match read_package_manifest(root) {
            Ok(packages) => packages,
            Err(e) => {
                warn!(error = %e, "skipping package checks");
                analysis.warnings.push(e.to_string());
                None
            }
        };

        debug!(
            assets = analysis.total_assets,
            modules = analysis.assembly_definitions.len(),
            "asset analysis finished"
        );
        Ok(analysis)
    }
}

/// Counts and sizes per kind plus the largest assets.
pub fn inventory(files: &[FileInfo]) -> AssetAnalysis {
    let assets: Vec<&FileInfo> = files.iter().filter(|f| f.kind.is_asset()).collect();
    let mut analysis = AssetAnalysis {
        total_assets: assets.len(),
        total_size_bytes: assets.iter().map(|f| f.size_bytes).sum(),
        ..Default::default()
    };
    for asset in &assets {
        let summary = analysis
            .by_kind
            .entry(asset.kind)
            .or_insert_with(AssetKindSummary::default);
        summary.count += 1;
        summary.total_bytes += asset.size_bytes;
    }

    let mut largest: Vec<AssetEntry> = assets
        .iter()
        .map(|f| AssetEntry {
            path: f.path.clone(),
            kind: f.kind,
            size_bytes: f.size_bytes,
        })
        .collect();
    largest.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes).then_with(|| a.path.cmp(&b.path)));
    largest.truncate(LARGEST_ASSET_COUNT);
    analysis.largest_assets = largest;
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ModuleConflictKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn info(path: &str, kind: FileKind, size_bytes: u64) -> FileInfo {
        let path = PathBuf::from(path);
        FileInfo {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            extension: path.extension().unwrap().to_string_lossy().into_owned(),
            depth: path.components().count(),
            path,
            kind,
            size_bytes,
        }
    }

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_inventory_counts_only_assets() {
        let mut files: Vec<FileInfo> = (0..12)
            .map(|i| info(&format!("Assets/Textures/T{i:02}.png"), FileKind::Texture, i))
            .collect();
        files.push(info("Assets/Scripts/A.cs", FileKind::Script, 1000));
        files.push(info("Assets/Audio/Theme.ogg", FileKind::Audio, 50));

        let analysis = inventory(&files);
        assert_eq!(analysis.total_assets, 13);
        assert_eq!(analysis.by_kind[&FileKind::Texture].count, 12);
        assert_eq!(analysis.by_kind[&FileKind::Audio].total_bytes, 50);
        assert!(!analysis.by_kind.contains_key(&FileKind::Script));
        assert_eq!(analysis.largest_assets.len(), LARGEST_ASSET_COUNT);
        assert_eq!(analysis.largest_assets[0].path, PathBuf::from("Assets/Audio/Theme.ogg"));
        assert_eq!(analysis.largest_assets[1].size_bytes, 11);
    }

    #[test]
    fn test_manifests_are_read() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Assets/Core/Core.asmdef", r#"{"name": "Core", "references": ["Game"]}"#);
        write(dir.path(), "Assets/Game/Game.asmdef", r#"{"name": "Game", "references": ["Core"]}"#);
        write(
            dir.path(),
            "Packages/manifest.json",
            r#"{"dependencies": {"com.unity.ugui": "1.0.0"}}"#,
        );
        let files = vec![
            info("Assets/Core/Core.asmdef", FileKind::ModuleManifest, 1),
            info("Assets/Game/Game.asmdef", FileKind::ModuleManifest, 1),
        ];

        let analysis =
            AssetAnalyzer::analyze(dir.path(), &files, &CancellationToken::new()).unwrap();
        assert_eq!(analysis.assembly_definitions.len(), 2);
        let conflicts = analysis.module_conflicts.unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ModuleConflictKind::CircularReference);
        assert_eq!(analysis.packages.unwrap().len(), 1);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_malformed_manifest_skips_only_its_check() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Assets/Core/Core.asmdef", "{ broken");
        write(dir.path(), "Packages/manifest.json", "{ \"dependencies\": 3 }");
        let files = vec![
            info("Assets/Core/Core.asmdef", FileKind::ModuleManifest, 1),
            info("Assets/Textures/A.png", FileKind::Texture, 3),
        ];

        let analysis =
            AssetAnalyzer::analyze(dir.path(), &files, &CancellationToken::new()).unwrap();
        assert!(analysis.module_conflicts.is_none());
        assert!(analysis.packages.is_none());
        assert_eq!(analysis.warnings.len(), 2);
        assert_eq!(analysis.total_assets, 1);
    }

    #[test]
    fn test_missing_package_manifest_is_not_a_warning() {
        let dir = TempDir::new().unwrap();
        let analysis = AssetAnalyzer::analyze(dir.path(), &[], &CancellationToken::new()).unwrap();
        assert!(analysis.packages.is_none());
        assert_eq!(analysis.module_conflicts, Some(Vec::new()));
        assert!(analysis.warnings.is_empty());
    }
}
