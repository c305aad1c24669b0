//! Module manifest (`.asmdef`) and package manifest parsing.
//!
//! Both formats are read defensively: callers turn errors into warnings and
//! skip only the check that depends on the manifest.

use crate::core::{AssemblyDefinition, ModuleConflict, ModuleConflictKind, PackageDependency};
use crate::errors::AnalysisError;
use crate::graph::cycles::{find_cycles, Adjacency};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct AsmdefFile {
    name: String,
    #[serde(default)]
    references: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PackageManifestFile {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// Parse one `.asmdef` document; `path` is recorded as given.
pub fn parse_assembly_definition(
    contents: &str,
    path: &Path,
) -> Result<AssemblyDefinition, AnalysisError> {
    let file: AsmdefFile = serde_json::from_str(contents)
        .map_err(|e| AnalysisError::manifest_with_path(e.to_string(), path))?;
    if file.name.trim().is_empty() {
        return Err(AnalysisError::manifest_with_path("module name is empty", path));
    }
    Ok(AssemblyDefinition {
        name: file.name,
        path: path.to_path_buf(),
        references: file.references,
    })
}

pub fn read_assembly_definition(
    absolute: &Path,
    relative: &Path,
) -> Result<AssemblyDefinition, AnalysisError> {
    let contents = std::fs::read_to_string(absolute)
        .map_err(|e| AnalysisError::manifest_with_path(e.to_string(), relative))?;
    parse_assembly_definition(&contents, relative)
}

pub fn parse_package_manifest(
    contents: &str,
    path: &Path,
) -> Result<Vec<PackageDependency>, AnalysisError> {
    let file: PackageManifestFile = serde_json::from_str(contents)
        .map_err(|e| AnalysisError::manifest_with_path(e.to_string(), path))?;
    Ok(file
        .dependencies
        .into_iter()
        .map(|(name, version)| PackageDependency {
            is_preview: is_preview_version(&version),
            name,
            version,
        })
        .collect())
}

/// `Ok(None)` when the project has no package manifest.
pub fn read_package_manifest(root: &Path) -> Result<Option<Vec<PackageDependency>>, AnalysisError> {
    let relative = PathBuf::from("Packages").join("manifest.json");
    let absolute = root.join(&relative);
    if !absolute.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&absolute)
        .map_err(|e| AnalysisError::manifest_with_path(e.to_string(), &relative))?;
    parse_package_manifest(&contents, &relative).map(Some)
}

/// Pre-release tags Unity uses for packages that are not production ready.
pub fn is_preview_version(version: &str) -> bool {
    let lower = version.to_ascii_lowercase();
    ["preview", "-pre.", "-exp", "-alpha", "-beta"]
        .iter()
        .any(|tag| lower.contains(tag))
}

/// Duplicate module names and reference cycles between modules.
pub fn module_conflicts(modules: &[AssemblyDefinition]) -> Vec<ModuleConflict> {
    let mut by_name: BTreeMap<&str, Vec<&AssemblyDefinition>> = BTreeMap::new();
    for module in modules {
        by_name.entry(module.name.as_str()).or_default().push(module);
    }

    let mut conflicts: Vec<ModuleConflict> = by_name
        .iter()
        .filter(|(_, defs)| defs.len() > 1)
        .map(|(name, defs)| {
            let paths: Vec<String> = defs.iter().map(|d| d.path.display().to_string()).collect();
            ModuleConflict {
                kind: ModuleConflictKind::DuplicateName,
                modules: vec![name.to_string()],
                description: format!(
                    "Module name '{}' is declared {} times: {}",
                    name,
                    defs.len(),
                    paths.join(", ")
                ),
            }
        })
        .collect();

    let mut adjacency = Adjacency::new();
    for module in modules {
        let targets = adjacency.entry(module.name.clone()).or_default();
        targets.extend(
            module
                .references
                .iter()
                .filter(|r| by_name.contains_key(r.as_str()) && **r != module.name)
                .cloned(),
        );
    }
    conflicts.extend(find_cycles(&adjacency).into_iter().map(|cycle| {
        let mut path = cycle.clone();
        if let Some(first) = cycle.first() {
            path.push(first.clone());
        }
        ModuleConflict {
            kind: ModuleConflictKind::CircularReference,
            description: format!("Modules reference each other in a cycle: {}", path.join(" -> ")),
            modules: cycle,
        }
    }));
    conflicts
}
