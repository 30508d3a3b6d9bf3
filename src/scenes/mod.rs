//! Ambient scene selection and playback.
//!
//! The scene manager owns the registry of discovered scene plugins and at most
//! one live scene. Scenes are driven through the same [`ContentModule`]
//! contract as verticals.

pub mod particles;

use anyhow::Result;
use ratatui::{layout::Rect, Frame};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::modules::ContentModule;
use crate::registry::ModuleRegistry;
use crate::tui::Theme;

pub use particles::ParticleScene;

struct ActiveScene {
    name: String,
    module: Box<dyn ContentModule>,
}

/// Owns the scene registry and the active scene.
pub struct SceneManager {
    registry: ModuleRegistry,
    active: Option<ActiveScene>,
}

impl SceneManager {
    /// Creates a manager over an already scanned registry.
    #[must_use]
    pub fn new(registry: ModuleRegistry) -> Self {
        Self {
            registry,
            active: None,
        }
    }

    /// Scans `directory` and creates a manager over the result.
    #[must_use]
    pub fn discover(directory: &Path) -> Self {
        Self::new(ModuleRegistry::scan(directory))
    }

    /// The scene registry.
    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Re-scans the scenes directory. The active scene keeps running.
    pub fn rescan(&mut self) {
        self.registry.rescan();
    }

    /// `(name, category)` pairs of every registered scene.
    #[must_use]
    pub fn scene_list(&self) -> Vec<(String, String)> {
        self.registry.get_scene_list()
    }

    /// Activates `name`, seeding it for `surface`.
    ///
    /// Returns `false` and keeps the current scene when `name` is unknown.
    pub fn set_active_scene(&mut self, name: &str, surface: Rect) -> bool {
        let Some(descriptor) = self.registry.get(name) else {
            tracing::warn!("scene '{name}' not found");
            return false;
        };

        let mut scene = ParticleScene::new(Arc::clone(&descriptor.loader));
        scene.init_scene(surface);
        tracing::info!("active scene: {name}");
        self.active = Some(ActiveScene {
            name: descriptor.name.clone(),
            module: Box::new(scene),
        });
        true
    }

    /// Name of the active scene.
    #[must_use]
    pub fn active_scene_name(&self) -> Option<&str> {
        self.active.as_ref().map(|scene| scene.name.as_str())
    }

    /// Stops the active scene.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Scene `offset` positions away from the active one, wrapping.
    ///
    /// With no active scene, the first scene is returned.
    #[must_use]
    pub fn scene_at_offset(&self, offset: isize) -> Option<String> {
        let scenes = self.registry.descriptors();
        if scenes.is_empty() {
            return None;
        }
        let current = self
            .active_scene_name()
            .and_then(|name| scenes.iter().position(|d| d.name == name));
        let idx = match current {
            #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
            Some(pos) => (pos as isize + offset).rem_euclid(scenes.len() as isize) as usize,
            None => 0,
        };
        scenes.get(idx).map(|d| d.name.clone())
    }

    /// Advances the active scene.
    pub fn update_active_scene(&mut self, dt: Duration) -> Result<()> {
        if let Some(scene) = self.active.as_mut() {
            scene.module.update(dt)?;
        }
        Ok(())
    }

    /// Draws the active scene. Draws nothing when no scene is active.
    pub fn render_active_scene(&self, f: &mut Frame, area: Rect, theme: &Theme) -> Result<()> {
        if let Some(scene) = self.active.as_ref() {
            scene.module.render(f, area, theme)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_scene(dir: &Path, file: &str, name: &str) {
        let text = format!(
            "SCENE_NAME = \"{name}\"\nSCENE_CATEGORY = \"Ambient\"\n[init_scene]\nseed = 1\n[update_scene]\n[render_scene]\n"
        );
        fs::write(dir.join(file), text).unwrap();
    }

    #[test]
    fn test_set_active_scene_unknown_keeps_current() {
        let dir = TempDir::new().unwrap();
        write_scene(dir.path(), "scene_a.toml", "Alpha");
        let mut manager = SceneManager::discover(dir.path());
        let surface = Rect::new(0, 0, 40, 12);

        assert!(manager.set_active_scene("Alpha", surface));
        assert!(!manager.set_active_scene("Missing", surface));
        assert_eq!(manager.active_scene_name(), Some("Alpha"));
    }

    #[test]
    fn test_scene_at_offset_wraps() {
        let dir = TempDir::new().unwrap();
        write_scene(dir.path(), "scene_a.toml", "Alpha");
        write_scene(dir.path(), "scene_b.toml", "Beta");
        let mut manager = SceneManager::discover(dir.path());
        let names: Vec<String> = manager.scene_list().into_iter().map(|(n, _)| n).collect();

        assert_eq!(manager.scene_at_offset(1).as_deref(), Some(names[0].as_str()));
        manager.set_active_scene(&names[1], Rect::new(0, 0, 10, 5));
        assert_eq!(manager.scene_at_offset(1).as_deref(), Some(names[0].as_str()));
        assert_eq!(manager.scene_at_offset(-1).as_deref(), Some(names[0].as_str()));
    }

    #[test]
    fn test_update_without_active_scene_is_noop() {
        let mut manager = SceneManager::new(ModuleRegistry::new());
        assert!(manager.update_active_scene(Duration::from_millis(16)).is_ok());
        assert!(manager.scene_at_offset(1).is_none());
    }
}
