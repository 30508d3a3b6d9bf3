//! Scene plugin registry.
//!
//! Scans a directory for `scene_*.toml` files, validates each against the
//! plugin contract and keeps the survivors in discovery order. A broken file
//! never stops the scan; it is logged and left out.

pub mod scene_file;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::{SCENE_FILE_PREFIX, SCENE_FILE_SUFFIX};
use crate::error::OrchestrationError;

pub use scene_file::SceneDefinition;

/// A validated scene plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDescriptor {
    /// Unique scene name
    pub name: String,
    /// Scene category
    pub category: String,
    /// File the scene was loaded from
    pub source: PathBuf,
    /// Loaded unit the scene runtime is built from
    pub loader: Arc<SceneDefinition>,
}

/// Registry of discovered scene plugins.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    descriptors: Arc<[ModuleDescriptor]>,
    skipped: Vec<OrchestrationError>,
    directory: Option<PathBuf>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptors: Arc::from(Vec::new()),
            skipped: Vec::new(),
            directory: None,
        }
    }

    /// Creates a registry and scans `directory`.
    #[must_use]
    pub fn scan(directory: &Path) -> Self {
        let mut registry = Self::new();
        registry.discover(directory);
        registry
    }

    /// Scans `directory`, replacing everything registered before.
    ///
    /// Snapshots taken earlier keep the previous list.
    pub fn discover(&mut self, directory: &Path) -> Arc<[ModuleDescriptor]> {
        let (descriptors, skipped) = discover(directory);
        tracing::info!(
            "discovered {} scene(s) in {} ({} skipped)",
            descriptors.len(),
            directory.display(),
            skipped.len()
        );

        self.descriptors = Arc::from(descriptors);
        self.skipped = skipped;
        self.directory = Some(directory.to_path_buf());
        self.snapshot()
    }

    /// Re-scans the directory of the last discovery.
    pub fn rescan(&mut self) -> Arc<[ModuleDescriptor]> {
        match self.directory.clone() {
            Some(directory) => self.discover(&directory),
            None => self.snapshot(),
        }
    }

    /// Shared handle to the current list.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[ModuleDescriptor]> {
        Arc::clone(&self.descriptors)
    }

    /// Registered scenes in discovery order.
    #[must_use]
    pub fn descriptors(&self) -> &[ModuleDescriptor] {
        &self.descriptors
    }

    /// Candidates rejected by the last scan.
    #[must_use]
    pub fn skipped(&self) -> &[OrchestrationError] {
        &self.skipped
    }

    /// Directory of the last scan.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Looks up a scene by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// `(name, category)` pairs in discovery order.
    #[must_use]
    pub fn get_scene_list(&self) -> Vec<(String, String)> {
        self.descriptors
            .iter()
            .map(|d| (d.name.clone(), d.category.clone()))
            .collect()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.descriptors
            .iter()
            .filter(|d| seen.insert(d.category.as_str()))
            .map(|d| d.category.clone())
            .collect()
    }

    /// Number of registered scenes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no scene is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Whether `file_name` names a scene plugin.
#[must_use]
pub fn is_scene_file(file_name: &str) -> bool {
    file_name.starts_with(SCENE_FILE_PREFIX) && file_name.ends_with(SCENE_FILE_SUFFIX)
}

/// Scans `directory` and returns the valid scenes plus every rejected candidate.
///
/// A missing or unreadable directory yields an empty list and a warning.
pub fn discover(directory: &Path) -> (Vec<ModuleDescriptor>, Vec<OrchestrationError>) {
    let mut descriptors: Vec<ModuleDescriptor> = Vec::new();
    let mut skipped = Vec::new();

    if !directory.is_dir() {
        tracing::warn!("scenes directory not found: {}", directory.display());
        return (descriptors, skipped);
    }

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!("cannot read scenes directory {}: {err}", directory.display());
            return (descriptors, skipped);
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let is_candidate = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_scene_file);
        if !is_candidate || !path.is_file() {
            continue;
        }

        match load_candidate(&path) {
            Ok(definition) => {
                if descriptors.iter().any(|d| d.name == definition.name) {
                    let err = OrchestrationError::DuplicateScene {
                        name: definition.name,
                        file: path,
                    };
                    tracing::warn!("skipping scene: {err}");
                    skipped.push(err);
                    continue;
                }
                tracing::debug!("registered scene '{}' from {}", definition.name, path.display());
                descriptors.push(ModuleDescriptor {
                    name: definition.name.clone(),
                    category: definition.category.clone(),
                    source: path,
                    loader: Arc::new(definition),
                });
            }
            Err(err) => {
                tracing::warn!("skipping scene: {err}");
                skipped.push(err);
            }
        }
    }

    (descriptors, skipped)
}

fn load_candidate(path: &Path) -> Result<SceneDefinition, OrchestrationError> {
    let text = fs::read_to_string(path).map_err(|e| OrchestrationError::SceneLoad {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    SceneDefinition::parse(path, &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_scene_file() {
        assert!(is_scene_file("scene_fireplace.toml"));
        assert!(!is_scene_file("fireplace.toml"));
        assert!(!is_scene_file("scene_fireplace.py"));
        assert!(!is_scene_file("scene_base"));
        assert!(!is_scene_file("my_scene_x.toml"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let registry = ModuleRegistry::scan(Path::new("/definitely/not/here/scenes"));
        assert!(registry.is_empty());
        assert!(registry.skipped().is_empty());
    }

    #[test]
    fn test_rescan_without_directory_keeps_empty_list() {
        let mut registry = ModuleRegistry::new();
        assert!(registry.rescan().is_empty());
        assert!(registry.directory().is_none());
    }
}
