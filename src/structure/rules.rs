//! Structural issue rules.
//!
//! Each rule is a pure function over the classified tree. Rules run in a
//! fixed order and each returns its issues sorted by path.

use crate::config::AnalyzerConfig;
use crate::core::{
    FileInfo, FolderInfo, FolderKind, IssueSeverity, StructureIssue, StructureIssueType,
};
use std::collections::BTreeSet;
use std::path::Path;

/// Classified tree handed to every rule.
pub struct TreeView<'a> {
    pub asset_root: &'a Path,
    pub folders: &'a [FolderInfo],
    pub files: &'a [FileInfo],
}

impl TreeView<'_> {
    fn folder_names(&self) -> BTreeSet<String> {
        self.folders
            .iter()
            .map(|f| f.name.to_ascii_lowercase())
            .collect()
    }
}

pub type StructureRule = fn(&TreeView<'_>, &AnalyzerConfig) -> Vec<StructureIssue>;

/// Rules in reporting order.
pub const RULES: &[StructureRule] = &[
    missing_critical_folders,
    missing_recommended_folders,
    naming_violations,
    deep_nesting,
    oversized_files,
    misplaced_files,
];

pub fn missing_critical_folders(
    tree: &TreeView<'_>,
    config: &AnalyzerConfig,
) -> Vec<StructureIssue> {
    missing_folders(
        tree,
        &config.catalog.critical_folders,
        StructureIssueType::MissingCriticalFolder,
        IssueSeverity::Warning,
    )
}

pub fn missing_recommended_folders(
    tree: &TreeView<'_>,
    config: &AnalyzerConfig,
) -> Vec<StructureIssue> {
    missing_folders(
        tree,
        &config.catalog.recommended_folders,
        StructureIssueType::MissingRecommendedFolder,
        IssueSeverity::Info,
    )
}

fn missing_folders(
    tree: &TreeView<'_>,
    expected: &[String],
    issue_type: StructureIssueType,
    severity: IssueSeverity,
) -> Vec<StructureIssue> {
    let present = tree.folder_names();
    expected
        .iter()
        .filter(|name| !present.contains(&name.to_ascii_lowercase()))
        .map(|name| StructureIssue {
            issue_type,
            severity,
            path: tree.asset_root.join(name),
            message: format!("No '{}' folder found", name),
            suggestion: format!(
                "Create {}/{} and move related files into it",
                tree.asset_root.display(),
                name
            ),
        })
        .collect()
}

/// Spaces, hyphens, other punctuation, or a lowercase first letter.
pub fn naming_problem(name: &str) -> Option<&'static str> {
    if name.contains(' ') {
        return Some("contains spaces");
    }
    if name.contains('-') {
        return Some("contains hyphens");
    }
    if name.chars().any(|c| !(c.is_alphanumeric() || c == '_')) {
        return Some("contains non-alphanumeric characters");
    }
    if name.chars().next().is_some_and(|c| c.is_lowercase()) {
        return Some("starts with a lowercase letter");
    }
    None
}

pub fn naming_violations(tree: &TreeView<'_>, _config: &AnalyzerConfig) -> Vec<StructureIssue> {
    let folders = tree
        .folders
        .iter()
        .map(|f| (f.path.as_path(), f.name.as_str(), "Folder"));
    let files = tree.files.iter().map(|f| (f.path.as_path(), file_stem(f), "File"));

    let mut issues: Vec<StructureIssue> = folders
        .chain(files)
        .filter_map(|(path, name, label)| {
            naming_problem(name).map(|problem| StructureIssue {
                issue_type: StructureIssueType::NamingViolation,
                severity: IssueSeverity::Info,
                path: path.to_path_buf(),
                message: format!("{} name '{}' {}", label, name, problem),
                suggestion: format!("Rename to PascalCase, e.g. '{}'", pascal_case(name)),
            })
        })
        .collect();
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    issues
}

fn file_stem(file: &FileInfo) -> &str {
    Path::new(&file.name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(&file.name)
}

/// Best-effort PascalCase rendering of a name for suggestions.
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Reports the shallowest entry of each subtree deeper than the limit.
pub fn deep_nesting(tree: &TreeView<'_>, config: &AnalyzerConfig) -> Vec<StructureIssue> {
    let limit = config.thresholds.max_path_depth;
    let folders = tree.folders.iter().map(|f| (&f.path, f.depth));
    let files = tree.files.iter().map(|f| (&f.path, f.depth));

    let mut issues: Vec<StructureIssue> = folders
        .chain(files)
        .filter(|(_, depth)| *depth == limit + 1)
        .map(|(path, depth)| StructureIssue {
            issue_type: StructureIssueType::DeepNesting,
            severity: IssueSeverity::Warning,
            path: path.clone(),
            message: format!("Path depth {} exceeds the limit of {}", depth, limit),
            suggestion: "Flatten the folder hierarchy".to_string(),
        })
        .collect();
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    issues
}

pub fn oversized_files(tree: &TreeView<'_>, config: &AnalyzerConfig) -> Vec<StructureIssue> {
    let limit = config.thresholds.max_file_size_bytes;
    tree.files
        .iter()
        .filter(|f| f.size_bytes > limit)
        .map(|f| StructureIssue {
            issue_type: StructureIssueType::OversizedFile,
            severity: IssueSeverity::Warning,
            path: f.path.clone(),
            message: format!(
                "{} is {:.1} MB (limit {:.1} MB)",
                f.name,
                megabytes(f.size_bytes),
                megabytes(limit)
            ),
            suggestion: "Compress the file or move it out of the asset tree".to_string(),
        })
        .collect()
}

pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// A file is misplaced when no folder on its path matches the folder
/// expected for its kind. Folder aliases (`Sprites` for `Textures`) count.
pub fn misplaced_files(tree: &TreeView<'_>, config: &AnalyzerConfig) -> Vec<StructureIssue> {
    let catalog = &config.catalog;
    tree.files
        .iter()
        .filter_map(|file| {
            let expected = catalog.expected_folder(file.kind)?;
            let folders = parent_folder_names(&file.path);
            if folders.iter().any(|name| catalog.is_exempt_folder(name)) {
                return None;
            }
            let expected_kind = catalog.folder_kind(expected);
            let placed = folders.iter().any(|name| {
                name.eq_ignore_ascii_case(expected)
                    || (expected_kind != FolderKind::Other
                        && catalog.folder_kind(name) == expected_kind)
            });
            (!placed).then(|| StructureIssue {
                issue_type: StructureIssueType::MisplacedFile,
                severity: IssueSeverity::Info,
                path: file.path.clone(),
                message: format!(
                    "{} file '{}' is not inside a '{}' folder",
                    file.kind, file.name, expected
                ),
                suggestion: format!("Move it under a '{}' folder", expected),
            })
        })
        .collect()
}

fn parent_folder_names(path: &Path) -> Vec<String> {
    path.parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Share of the standard catalog present directly under the asset root.
pub fn standard_folder_ratio(tree: &TreeView<'_>, config: &AnalyzerConfig) -> f64 {
    let standard = &config.catalog.standard_folders;
    if standard.is_empty() {
        return 0.0;
    }
    let top_level: BTreeSet<String> = tree
        .folders
        .iter()
        .filter(|f| f.path.parent() == Some(tree.asset_root))
        .map(|f| f.name.to_ascii_lowercase())
        .collect();
    let present = standard
        .iter()
        .filter(|name| top_level.contains(&name.to_ascii_lowercase()))
        .count();
    present as f64 / standard.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileKind;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn folder(path: &str) -> FolderInfo {
        let path = PathBuf::from(path);
        FolderInfo {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            depth: path.components().count(),
            path,
            kind: FolderKind::Other,
            file_count: 0,
        }
    }

    fn file(path: &str, kind: FileKind, size_bytes: u64) -> FileInfo {
        let path = PathBuf::from(path);
        FileInfo {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
            depth: path.components().count(),
            path,
            kind,
            size_bytes,
        }
    }

    fn view<'a>(folders: &'a [FolderInfo], files: &'a [FileInfo]) -> TreeView<'a> {
        TreeView {
            asset_root: Path::new("Assets"),
            folders,
            files,
        }
    }

    #[test]
    fn test_missing_folder_severities() {
        let config = AnalyzerConfig::default();
        let folders = vec![folder("Assets/Audio")];
        let tree = view(&folders, &[]);

        let critical = missing_critical_folders(&tree, &config);
        let names: Vec<_> = critical.iter().map(|i| i.path.clone()).collect();
        assert_eq!(names, vec![PathBuf::from("Assets/Scripts"), PathBuf::from("Assets/Scenes")]);
        assert!(critical.iter().all(|i| i.severity == IssueSeverity::Warning));

        let recommended = missing_recommended_folders(&tree, &config);
        assert_eq!(recommended.len(), 3);
        assert!(recommended.iter().all(|i| i.severity == IssueSeverity::Info));
    }

    #[test]
    fn test_nested_folders_count_as_present() {
        let config = AnalyzerConfig::default();
        let folders = vec![folder("Assets/Game"), folder("Assets/Game/scripts")];
        let issues = missing_critical_folders(&view(&folders, &[]), &config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, PathBuf::from("Assets/Scenes"));
    }

    #[test]
    fn test_naming_problems() {
        assert_eq!(naming_problem("PlayerController"), None);
        assert_eq!(naming_problem("Player_Controller"), None);
        assert_eq!(naming_problem("My Scripts"), Some("contains spaces"));
        assert_eq!(naming_problem("third-party"), Some("contains hyphens"));
        assert_eq!(naming_problem("Level(1)"), Some("contains non-alphanumeric characters"));
        assert_eq!(naming_problem("player"), Some("starts with a lowercase letter"));
        assert_eq!(pascal_case("my cool-folder"), "MyCoolFolder");
    }

    #[test]
    fn test_naming_checks_file_stems() {
        let config = AnalyzerConfig::default();
        let files = vec![
            file("Assets/Scripts/Player.cs", FileKind::Script, 1),
            file("Assets/Scripts/enemy ai.cs", FileKind::Script, 1),
        ];
        let issues = naming_violations(&view(&[], &files), &config);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("'enemy ai'"));
    }

    #[test]
    fn test_deep_nesting_reports_each_subtree_once() {
        let mut config = AnalyzerConfig::default();
        config.thresholds.max_path_depth = 3;
        let folders = vec![
            folder("Assets/A"),
            folder("Assets/A/B"),
            folder("Assets/A/B/C"),
            folder("Assets/A/B/C/D"),
        ];
        let files = vec![file("Assets/A/B/C/D/X.cs", FileKind::Script, 1)];
        let issues = deep_nesting(&view(&folders, &files), &config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, PathBuf::from("Assets/A/B/C"));
        assert_eq!(issues[0].severity, IssueSeverity::Warning);
    }

    #[test]
    fn test_oversized_files() {
        let mut config = AnalyzerConfig::default();
        config.thresholds.max_file_size_bytes = 100;
        let files = vec![
            file("Assets/Audio/Big.wav", FileKind::Audio, 101),
            file("Assets/Audio/Small.wav", FileKind::Audio, 100),
        ];
        let issues = oversized_files(&view(&[], &files), &config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, PathBuf::from("Assets/Audio/Big.wav"));
    }

    #[test]
    fn test_misplaced_files_respect_aliases_and_exemptions() {
        let config = AnalyzerConfig::default();
        let files = vec![
            file("Assets/Scripts/Player.cs", FileKind::Script, 1),
            file("Assets/Art/Sprites/Hero.png", FileKind::Texture, 1),
            file("Assets/Plugins/Lib/Thing.cs", FileKind::Script, 1),
            file("Assets/Hero.prefab", FileKind::Prefab, 1),
            file("Assets/notes.txt", FileKind::Data, 1),
        ];
        let issues = misplaced_files(&view(&[], &files), &config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, PathBuf::from("Assets/Hero.prefab"));
        assert_eq!(issues[0].severity, IssueSeverity::Info);
    }

    #[test]
    fn test_standard_ratio_uses_top_level_only() {
        let config = AnalyzerConfig::default();
        let folders = vec![
            folder("Assets/Scripts"),
            folder("Assets/Scenes"),
            folder("Assets/Game/Prefabs"),
        ];
        let ratio = standard_folder_ratio(&view(&folders, &[]), &config);
        let expected = 2.0 / config.catalog.standard_folders.len() as f64;
        assert!((ratio - expected).abs() < 1e-9);
    }
}
