//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{CONFIG_DIR_NAME, ENV_FULLSCREEN, ENV_WINDOWED};

/// Longest boot or cursor-idle time accepted, in seconds.
pub const MAX_DISPLAY_SECS: f32 = 86_400.0;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Settings document (defaults to `<config dir>/settings.json`)
    pub settings_file: Option<PathBuf>,
    /// Directory scanned for scene plugins
    pub scenes_dir: Option<PathBuf>,
    /// Log file (defaults to `<config dir>/motibeam.log`)
    pub log_file: Option<PathBuf>,
}

/// Timing and frame-rate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Boot screen duration in seconds
    pub boot_secs: f32,
    /// Default on-screen time of a vertical in seconds
    pub module_run_secs: u64,
    /// Time each vertical stays up in the auto demo, in seconds
    pub demo_dwell_secs: u64,
    /// Pointer idle time before the cursor hides, in seconds
    pub cursor_idle_secs: f32,
    /// Frame rate of boot, menu and settings screens
    pub menu_fps: u32,
    /// Frame rate of verticals, scenes and the auto demo
    pub module_fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            boot_secs: 5.0,
            module_run_secs: 300,
            demo_dwell_secs: 30,
            cursor_idle_secs: 3.0,
            menu_fps: 30,
            module_fps: 60,
        }
    }
}

impl DisplayConfig {
    /// Boot screen duration.
    #[must_use]
    pub fn boot_duration(&self) -> Duration {
        Duration::from_secs_f32(self.boot_secs.max(0.0).min(MAX_DISPLAY_SECS))
    }

    /// Default on-screen time of a vertical.
    #[must_use]
    pub const fn module_run_duration(&self) -> Duration {
        Duration::from_secs(self.module_run_secs)
    }

    /// Dwell time per vertical in the auto demo.
    #[must_use]
    pub const fn demo_dwell(&self) -> Duration {
        Duration::from_secs(self.demo_dwell_secs)
    }

    /// Pointer idle time before the cursor hides.
    #[must_use]
    pub fn cursor_idle(&self) -> Duration {
        Duration::from_secs_f32(self.cursor_idle_secs.max(0.0).min(MAX_DISPLAY_SECS))
    }

    /// Frame budget for a given frame rate.
    #[must_use]
    pub fn frame_budget(fps: u32) -> Duration {
        Duration::from_secs(1) / fps.max(1)
    }
}

/// How the shell takes over the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Alternate screen, whole terminal
    #[default]
    Fullscreen,
    /// Inline viewport below the prompt
    Windowed,
}

impl DisplayMode {
    /// Resolves the display mode from explicit flags and the environment.
    ///
    /// Fullscreen wins whenever both are requested.
    #[must_use]
    pub fn resolve(force_fullscreen: bool, force_windowed: bool) -> Self {
        let env_set = |name: &str| {
            std::env::var(name).is_ok_and(|v| matches!(v.trim(), "1" | "true" | "yes"))
        };
        Self::from_flags(
            force_fullscreen || env_set(ENV_FULLSCREEN),
            force_windowed || env_set(ENV_WINDOWED),
        )
    }

    /// Resolves the display mode from already collected flags.
    #[must_use]
    pub const fn from_flags(fullscreen: bool, windowed: bool) -> Self {
        if !fullscreen && windowed {
            Self::Windowed
        } else {
            Self::Fullscreen
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// File system locations
    pub paths: PathConfig,
    /// Timing and frame rates
    pub display: DisplayConfig,
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/MotiBeam/`
    /// - macOS: `~/Library/Application Support/MotiBeam/`
    /// - Windows: `%APPDATA%\MotiBeam\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to an explicit path using temp file + rename.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - frame rates are within 1..=240
    /// - boot and cursor-idle times are within 0..=MAX_DISPLAY_SECS
    /// - the auto demo dwell is at least one second
    pub fn validate(&self) -> Result<()> {
        let display = &self.display;

        for (name, fps) in [("menu_fps", display.menu_fps), ("module_fps", display.module_fps)] {
            if !(1..=240).contains(&fps) {
                anyhow::bail!("display.{name} must be between 1 and 240, got {fps}");
            }
        }

        for (name, secs) in [
            ("boot_secs", display.boot_secs),
            ("cursor_idle_secs", display.cursor_idle_secs),
        ] {
            if !(0.0..=MAX_DISPLAY_SECS).contains(&secs) {
                anyhow::bail!(
                    "display.{name} must be between 0 and {MAX_DISPLAY_SECS} seconds, got {secs}"
                );
            }
        }

        if display.demo_dwell_secs == 0 {
            anyhow::bail!("display.demo_dwell_secs must be at least 1");
        }

        Ok(())
    }

    /// Settings file path, falling back to the config directory.
    pub fn settings_file(&self) -> Result<PathBuf> {
        match &self.paths.settings_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("settings.json")),
        }
    }

    /// Log file path, falling back to the config directory.
    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.paths.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("motibeam.log")),
        }
    }

    /// Scenes directory.
    ///
    /// Uses the configured directory, then `./scenes` when it exists, then
    /// `<config dir>/scenes`.
    pub fn scenes_dir(&self) -> Result<PathBuf> {
        if let Some(path) = &self.paths.scenes_dir {
            return Ok(path.clone());
        }
        let local = PathBuf::from("scenes");
        if local.is_dir() {
            return Ok(local);
        }
        Ok(Self::config_dir()?.join("scenes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.paths, PathConfig::default());
        assert!((config.display.boot_secs - 5.0).abs() < f32::EPSILON);
        assert_eq!(config.display.cursor_idle(), Duration::from_secs(3));
        assert_eq!(config.display.module_run_duration(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.display.demo_dwell_secs = 12;
        config.paths.scenes_dir = Some(PathBuf::from("/srv/scenes"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[display]\nmenu_fps = 20\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.display.menu_fps, 20);
        assert_eq!(loaded.display.module_fps, 60);
    }

    #[test]
    fn test_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::new();
        config.display.menu_fps = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.display.cursor_idle_secs = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.display.demo_dwell_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.display.boot_secs = 1e30;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.display.cursor_idle_secs = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_file_durations_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[display]\nboot_secs = 1e30\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_duration_accessors_never_panic() {
        let mut display = DisplayConfig::default();
        display.boot_secs = f32::INFINITY;
        display.cursor_idle_secs = f32::NAN;
        assert_eq!(
            display.boot_duration(),
            Duration::from_secs_f32(MAX_DISPLAY_SECS)
        );
        assert_eq!(display.cursor_idle(), Duration::ZERO);
    }

    #[test]
    fn test_frame_budget() {
        assert_eq!(DisplayConfig::frame_budget(50), Duration::from_millis(20));
        assert_eq!(DisplayConfig::frame_budget(0), Duration::from_secs(1));
    }

    #[test]
    fn test_display_mode_fullscreen_wins() {
        assert_eq!(DisplayMode::from_flags(false, false), DisplayMode::Fullscreen);
        assert_eq!(DisplayMode::from_flags(false, true), DisplayMode::Windowed);
        assert_eq!(DisplayMode::from_flags(true, true), DisplayMode::Fullscreen);
    }
}
