//! Folder catalog, naming patterns and extension tables.

use crate::core::{FileKind, FolderKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPattern {
    /// Folder name, compared case-insensitively
    pub name: String,
    pub kind: FolderKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedFolder {
    pub kind: FileKind,
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionMapping {
    /// Lowercase, without the leading dot
    pub extension: String,
    pub kind: FileKind,
}

/// Folder expectations for a Unity asset tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Absence is a Warning
    #[serde(default = "default_critical_folders")]
    pub critical_folders: Vec<String>,

    /// Absence is Info
    #[serde(default = "default_recommended_folders")]
    pub recommended_folders: Vec<String>,

    /// Used for the standard-structure ratio
    #[serde(default = "default_standard_folders")]
    pub standard_folders: Vec<String>,

    #[serde(default = "default_folder_patterns")]
    pub folder_patterns: Vec<FolderPattern>,

    #[serde(default = "default_expected_folders")]
    pub expected_folders: Vec<ExpectedFolder>,

    /// Files below any of these folders are never reported as misplaced
    #[serde(default = "default_misplacement_exempt")]
    pub misplacement_exempt: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            critical_folders: default_critical_folders(),
            recommended_folders: default_recommended_folders(),
            standard_folders: default_standard_folders(),
            folder_patterns: default_folder_patterns(),
            expected_folders: default_expected_folders(),
            misplacement_exempt: default_misplacement_exempt(),
        }
    }
}

impl CatalogConfig {
    /// Classify a folder by name through the naming-pattern map.
    pub fn folder_kind(&self, name: &str) -> FolderKind {
        self.folder_patterns
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.kind)
            .unwrap_or(FolderKind::Other)
    }

    pub fn expected_folder(&self, kind: FileKind) -> Option<&str> {
        self.expected_folders
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.folder.as_str())
    }

    pub fn is_exempt_folder(&self, name: &str) -> bool {
        self.misplacement_exempt
            .iter()
            .any(|exempt| exempt.eq_ignore_ascii_case(name))
    }
}

/// Extension allow-lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    /// Files the extractor parses
    #[serde(default = "default_source_extensions")]
    pub source: Vec<String>,

    /// Extensions never reported (editor metadata)
    #[serde(default = "default_ignored_extensions")]
    pub ignored: Vec<String>,

    #[serde(default = "default_asset_extensions")]
    pub assets: Vec<ExtensionMapping>,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            source: default_source_extensions(),
            ignored: default_ignored_extensions(),
            assets: default_asset_extensions(),
        }
    }
}

impl ExtensionsConfig {
    pub fn is_source(&self, extension: &str) -> bool {
        self.source.iter().any(|e| e.eq_ignore_ascii_case(extension))
    }

    pub fn is_ignored(&self, extension: &str) -> bool {
        self.ignored.iter().any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Kind of a file, by extension only.
    pub fn kind_for(&self, extension: &str) -> FileKind {
        if self.is_source(extension) {
            return FileKind::Script;
        }
        self.assets
            .iter()
            .find(|m| m.extension.eq_ignore_ascii_case(extension))
            .map(|m| m.kind)
            .unwrap_or(FileKind::Other)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn default_critical_folders() -> Vec<String> {
    strings(&["Scripts", "Scenes"])
}

fn default_recommended_folders() -> Vec<String> {
    strings(&["Prefabs", "Materials", "Textures"])
}

fn default_standard_folders() -> Vec<String> {
    strings(&[
        "Scripts",
        "Scenes",
        "Prefabs",
        "Materials",
        "Textures",
        "Audio",
        "Animations",
        "Models",
        "Resources",
        "Editor",
        "Plugins",
    ])
}

fn default_folder_patterns() -> Vec<FolderPattern> {
    static PATTERNS: &[(&str, FolderKind)] = &[
        ("Scripts", FolderKind::Scripts),
        ("Script", FolderKind::Scripts),
        ("Code", FolderKind::Scripts),
        ("Source", FolderKind::Scripts),
        ("Src", FolderKind::Scripts),
        ("Scenes", FolderKind::Scenes),
        ("Levels", FolderKind::Scenes),
        ("Prefabs", FolderKind::Prefabs),
        ("Materials", FolderKind::Materials),
        ("Textures", FolderKind::Textures),
        ("Sprites", FolderKind::Textures),
        ("Images", FolderKind::Textures),
        ("Audio", FolderKind::Audio),
        ("Sounds", FolderKind::Audio),
        ("Music", FolderKind::Audio),
        ("SFX", FolderKind::Audio),
        ("Models", FolderKind::Models),
        ("Meshes", FolderKind::Models),
        ("Animations", FolderKind::Animations),
        ("Animators", FolderKind::Animations),
        ("Shaders", FolderKind::Shaders),
        ("Fonts", FolderKind::Fonts),
        ("Resources", FolderKind::Resources),
        ("Editor", FolderKind::Editor),
        ("Plugins", FolderKind::Plugins),
        ("StreamingAssets", FolderKind::StreamingAssets),
        ("Tests", FolderKind::Tests),
        ("Test", FolderKind::Tests),
        ("ThirdParty", FolderKind::ThirdParty),
        ("Vendor", FolderKind::ThirdParty),
    ];
    PATTERNS
        .iter()
        .map(|(name, kind)| FolderPattern {
            name: name.to_string(),
            kind: *kind,
        })
        .collect()
}

fn default_expected_folders() -> Vec<ExpectedFolder> {
    static EXPECTED: &[(FileKind, &str)] = &[
        (FileKind::Script, "Scripts"),
        (FileKind::Scene, "Scenes"),
        (FileKind::Prefab, "Prefabs"),
        (FileKind::Material, "Materials"),
        (FileKind::Texture, "Textures"),
        (FileKind::Audio, "Audio"),
        (FileKind::Model, "Models"),
        (FileKind::Animation, "Animations"),
        (FileKind::Shader, "Shaders"),
    ];
    EXPECTED
        .iter()
        .map(|(kind, folder)| ExpectedFolder {
            kind: *kind,
            folder: folder.to_string(),
        })
        .collect()
}

fn default_misplacement_exempt() -> Vec<String> {
    strings(&["Plugins", "ThirdParty", "Vendor", "Packages"])
}

fn default_source_extensions() -> Vec<String> {
    strings(&["cs"])
}

fn default_ignored_extensions() -> Vec<String> {
    strings(&["meta"])
}

fn default_asset_extensions() -> Vec<ExtensionMapping> {
    static EXTENSIONS: &[(&str, FileKind)] = &[
        ("unity", FileKind::Scene),
        ("prefab", FileKind::Prefab),
        ("mat", FileKind::Material),
        ("png", FileKind::Texture),
        ("jpg", FileKind::Texture),
        ("jpeg", FileKind::Texture),
        ("tga", FileKind::Texture),
        ("psd", FileKind::Texture),
        ("tif", FileKind::Texture),
        ("tiff", FileKind::Texture),
        ("bmp", FileKind::Texture),
        ("gif", FileKind::Texture),
        ("exr", FileKind::Texture),
        ("hdr", FileKind::Texture),
        ("wav", FileKind::Audio),
        ("mp3", FileKind::Audio),
        ("ogg", FileKind::Audio),
        ("aif", FileKind::Audio),
        ("aiff", FileKind::Audio),
        ("flac", FileKind::Audio),
        ("fbx", FileKind::Model),
        ("obj", FileKind::Model),
        ("blend", FileKind::Model),
        ("dae", FileKind::Model),
        ("3ds", FileKind::Model),
        ("anim", FileKind::Animation),
        ("controller", FileKind::Animation),
        ("overridecontroller", FileKind::Animation),
        ("shader", FileKind::Shader),
        ("shadergraph", FileKind::Shader),
        ("hlsl", FileKind::Shader),
        ("cginc", FileKind::Shader),
        ("compute", FileKind::Shader),
        ("ttf", FileKind::Font),
        ("otf", FileKind::Font),
        ("asmdef", FileKind::ModuleManifest),
        ("asset", FileKind::Data),
        ("json", FileKind::Data),
        ("xml", FileKind::Data),
        ("txt", FileKind::Data),
        ("csv", FileKind::Data),
        ("bytes", FileKind::Data),
    ];
    EXTENSIONS
        .iter()
        .map(|(extension, kind)| ExtensionMapping {
            extension: extension.to_string(),
            kind: *kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_kind_is_case_insensitive() {
        let catalog = CatalogConfig::default();
        assert_eq!(catalog.folder_kind("scripts"), FolderKind::Scripts);
        assert_eq!(catalog.folder_kind("SPRITES"), FolderKind::Textures);
        assert_eq!(catalog.folder_kind("Gameplay"), FolderKind::Other);
    }

    #[test]
    fn test_extension_kinds() {
        let extensions = ExtensionsConfig::default();
        assert_eq!(extensions.kind_for("cs"), FileKind::Script);
        assert_eq!(extensions.kind_for("PNG"), FileKind::Texture);
        assert_eq!(extensions.kind_for("asmdef"), FileKind::ModuleManifest);
        assert_eq!(extensions.kind_for("exe"), FileKind::Other);
        assert!(extensions.is_ignored("meta"));
    }

    #[test]
    fn test_expected_folder_lookup() {
        let catalog = CatalogConfig::default();
        assert_eq!(catalog.expected_folder(FileKind::Prefab), Some("Prefabs"));
        assert_eq!(catalog.expected_folder(FileKind::Data), None);
    }
}
