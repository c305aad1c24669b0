//! Folder/file classification and structural issues.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Role of a folder, derived from its name through the naming-pattern map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderKind {
    Scripts,
    Scenes,
    Prefabs,
    Materials,
    Textures,
    Audio,
    Models,
    Animations,
    Shaders,
    Fonts,
    Resources,
    Editor,
    Plugins,
    StreamingAssets,
    Tests,
    ThirdParty,
    Other,
}

/// Kind of a file, decided by extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Script,
    Scene,
    Prefab,
    Material,
    Texture,
    Audio,
    Model,
    Animation,
    Shader,
    Font,
    ModuleManifest,
    Data,
    Other,
}

impl FileKind {
    pub fn is_asset(&self) -> bool {
        !matches!(self, Self::Script | Self::ModuleManifest | Self::Other)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Script => "script",
            Self::Scene => "scene",
            Self::Prefab => "prefab",
            Self::Material => "material",
            Self::Texture => "texture",
            Self::Audio => "audio",
            Self::Model => "model",
            Self::Animation => "animation",
            Self::Shader => "shader",
            Self::Font => "font",
            Self::ModuleManifest => "module manifest",
            Self::Data => "data",
            Self::Other => "other",
        };
        f.write_str(text)
    }
}

/// Severity tiers for structural, code and performance issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureIssueType {
    MissingCriticalFolder,
    MissingRecommendedFolder,
    NamingViolation,
    DeepNesting,
    OversizedFile,
    MisplacedFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureIssue {
    pub issue_type: StructureIssueType,
    pub severity: IssueSeverity,
    /// Path relative to the project root
    pub path: PathBuf,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    /// Path relative to the project root
    pub path: PathBuf,
    pub name: String,
    pub kind: FolderKind,
    /// Number of path components below the project root
    pub depth: usize,
    /// Files directly inside this folder
    pub file_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path relative to the project root
    pub path: PathBuf,
    pub name: String,
    pub extension: String,
    pub kind: FileKind,
    pub size_bytes: u64,
    pub depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureAnalysis {
    /// Sorted by path
    pub folders: Vec<FolderInfo>,
    /// Sorted by path
    pub files: Vec<FileInfo>,
    pub issues: Vec<StructureIssue>,
    pub kind_counts: BTreeMap<FileKind, usize>,
    pub total_size_bytes: u64,
    /// Fraction of the standard folder catalog present at the asset-root level
    pub standard_folder_ratio: f64,
    pub follows_standard_structure: bool,
    pub has_readme: bool,
    /// Entries that could not be read during the walk
    pub warnings: Vec<String>,
}

impl StructureAnalysis {
    pub fn issues_of(
        &self,
        issue_type: StructureIssueType,
    ) -> impl Iterator<Item = &StructureIssue> {
        self.issues.iter().filter(move |i| i.issue_type == issue_type)
    }

    pub fn files_of(&self, kind: FileKind) -> impl Iterator<Item = &FileInfo> {
        self.files.iter().filter(move |f| f.kind == kind)
    }

    pub fn count_by_severity(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(IssueSeverity::Critical > IssueSeverity::Warning);
        assert!(IssueSeverity::Warning > IssueSeverity::Info);
    }

    #[test]
    fn test_asset_kinds() {
        assert!(FileKind::Texture.is_asset());
        assert!(FileKind::Scene.is_asset());
        assert!(!FileKind::Script.is_asset());
        assert!(!FileKind::ModuleManifest.is_asset());
    }
}
