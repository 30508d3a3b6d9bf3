//! Persistent user settings.
//!
//! Settings are a nested `section -> key -> value` JSON document. The store is
//! loaded once at startup and written through to disk on every change, so a
//! crash never loses more than the change in flight.

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::OS_VERSION;

/// Section holding the ambient scene selection.
pub const SECTION_SCENES: &str = "Scenes";
/// Section holding the auto-demo switches.
pub const SECTION_DEMO: &str = "Demo";
/// Section holding the visual preferences.
pub const SECTION_VISUALS: &str = "Visuals";

/// Options offered for `Display.screen_ratio`.
pub const SCREEN_RATIOS: [&str; 3] = ["Auto", "16:9", "4:3"];
/// Options offered for `Visuals.theme`.
pub const THEMES: [&str; 3] = ["Auto", "Light", "Dark"];
/// Options offered for `Profiles.active_profile` and `Demo.demo_profile`.
pub const PROFILES: [&str; 4] = ["Smart Home", "Auto", "Wellness", "Delivery"];

/// Returns the default settings document.
#[must_use]
pub fn default_settings() -> Value {
    json!({
        "Display": {
            "brightness": 75,
            "screen_ratio": "Auto",
        },
        "Visuals": {
            "theme": "Dark",
            "animation_speed": 50,
        },
        "Scenes": {
            "active_scene": "Fireplace",
            "category_filter": "All",
        },
        "Sensors": {
            "presence_detection": false,
            "mic_sensitivity": 60,
        },
        "Profiles": {
            "active_profile": "Smart Home",
        },
        "System": {
            "version": OS_VERSION,
        },
        "Demo": {
            "enabled": false,
            "demo_profile": "Smart Home",
        },
    })
}

/// Settings document with write-through persistence.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    data: Map<String, Value>,
}

impl SettingsStore {
    /// Loads settings from `path`.
    ///
    /// A missing file is created with defaults. A corrupt file is logged and
    /// replaced in memory by defaults (the file itself is left untouched until
    /// the next change). Sections and keys missing from the file are filled in
    /// from the defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if !path.exists() {
            let store = Self::with_path(Some(path.clone()), default_object());
            if let Err(err) = store.save() {
                tracing::warn!("could not write default settings to {}: {err:#}", path.display());
            } else {
                tracing::info!("created default settings at {}", path.display());
            }
            return store;
        }

        let data = match Self::read(&path) {
            Ok(mut data) => {
                merge_defaults(&mut data);
                data
            }
            Err(err) => {
                tracing::warn!("using default settings: {err:#}");
                default_object()
            }
        };

        Self::with_path(Some(path), data)
    }

    /// Creates a store that never touches the filesystem.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_path(None, default_object())
    }

    fn with_path(path: Option<PathBuf>, data: Map<String, Value>) -> Self {
        Self { path, data }
    }

    fn read(path: &Path) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("Settings file is not a JSON object: {}", path.display()),
        }
    }

    /// Path the store persists to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the raw value at `section.key`.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.data.get(section)?.get(key)
    }

    /// Returns `section.key` as a string slice.
    #[must_use]
    pub fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key)?.as_str()
    }

    /// Returns `section.key` as a bool, `false` when absent or mistyped.
    #[must_use]
    pub fn get_bool(&self, section: &str, key: &str) -> bool {
        self.get(section, key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Returns `section.key` as an integer.
    #[must_use]
    pub fn get_i64(&self, section: &str, key: &str) -> Option<i64> {
        self.get(section, key)?.as_i64()
    }

    /// Sets `section.key` and saves immediately if the value changed.
    ///
    /// The in-memory value is updated even when the save fails.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if self.get(section, key) == Some(&value) {
            return Ok(());
        }

        let entry = self
            .data
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(key.to_string(), value);
        }

        tracing::debug!("setting {section}.{key} changed");
        self.save()
    }

    /// Restores every setting to its default and saves.
    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.data = default_object();
        tracing::info!("settings reset to defaults");
        self.save()
    }

    /// Saves settings using temp file + rename.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(&self.data)
            .context("Failed to serialize settings")?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp settings file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp settings file to: {}", path.display()))?;

        Ok(())
    }

    /// Name of the ambient scene to show.
    #[must_use]
    pub fn active_scene(&self) -> Option<&str> {
        self.get_str(SECTION_SCENES, "active_scene")
    }

    /// Whether ambient mode should hand over to the auto demo.
    #[must_use]
    pub fn demo_enabled(&self) -> bool {
        self.get_bool(SECTION_DEMO, "enabled")
    }

    /// Profile the auto demo starts from.
    #[must_use]
    pub fn demo_profile(&self) -> Option<&str> {
        self.get_str(SECTION_DEMO, "demo_profile")
    }

    /// Scene animation speed as a multiplier, 1.0 at the default of 50.
    #[must_use]
    pub fn animation_speed_factor(&self) -> f32 {
        let speed = self
            .get_i64(SECTION_VISUALS, "animation_speed")
            .unwrap_or(50)
            .clamp(0, 100);
        #[allow(clippy::cast_precision_loss)]
        let factor = speed as f32 / 50.0;
        factor
    }
}

fn default_object() -> Map<String, Value> {
    match default_settings() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Fills sections and keys absent from `data` with their defaults.
fn merge_defaults(data: &mut Map<String, Value>) {
    for (section, defaults) in default_object() {
        let Value::Object(defaults) = defaults else {
            continue;
        };
        match data.get_mut(&section) {
            Some(Value::Object(existing)) => {
                for (key, value) in defaults {
                    existing.entry(key).or_insert(value);
                }
            }
            _ => {
                data.insert(section, Value::Object(defaults));
            }
        }
    }
}
