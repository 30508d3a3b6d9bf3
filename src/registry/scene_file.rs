//! Scene plugin file format.
//!
//! A scene plugin is a TOML file named `scene_<anything>.toml`:
//!
//! ```toml
//! SCENE_NAME = "Fireplace"
//! SCENE_CATEGORY = "Ambient"
//!
//! [init_scene]
//! particles = 60
//! spawn = "bottom"
//!
//! [update_scene]
//! velocity = [0.0, -4.0]
//! jitter = 1.5
//! lifetime = [1.0, 3.0]
//!
//! [render_scene]
//! background = "#140500"
//! gradient = ["#1e0800", "#642000"]
//! palette = ["#ff6a00", "#ffb000", "#ffe070"]
//! glyphs = "^*'."
//! ```
//!
//! The two identifiers and the three entry-point tables are the plugin
//! contract. Every key inside the tables is optional.

use ratatui::style::Color;
use serde::Deserialize;
use std::path::Path;

use crate::error::OrchestrationError;

/// Identifier holding the unique scene name.
pub const NAME_KEY: &str = "SCENE_NAME";
/// Identifier holding the scene category.
pub const CATEGORY_KEY: &str = "SCENE_CATEGORY";
/// Entry point seeding the scene.
pub const INIT_ENTRY: &str = "init_scene";
/// Entry point advancing the scene.
pub const UPDATE_ENTRY: &str = "update_scene";
/// Entry point drawing the scene.
pub const RENDER_ENTRY: &str = "render_scene";

/// Upper bound on live particles per scene.
pub const MAX_PARTICLES: usize = 5000;
/// Upper bound on drift and jitter, in cells per second.
pub const MAX_SPEED: f32 = 1000.0;
/// Upper bound on particle lifetime, in seconds.
pub const MAX_LIFETIME: f32 = 3600.0;

const IDENTIFIERS: [&str; 2] = [NAME_KEY, CATEGORY_KEY];
const ENTRY_POINTS: [&str; 3] = [INIT_ENTRY, UPDATE_ENTRY, RENDER_ENTRY];

/// An RGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct SceneColor(pub u8, pub u8, pub u8);

impl SceneColor {
    /// Converts to a terminal color.
    #[must_use]
    pub const fn to_color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }

    /// Linear blend towards `other`, `t` in `0.0..=1.0`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            let value = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let byte = value.round().clamp(0.0, 255.0) as u8;
            byte
        };
        Self(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl TryFrom<String> for SceneColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| format!("invalid color '{value}', expected #rrggbb"))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| format!("invalid color '{value}', expected #rrggbb"))
        };
        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Where new particles appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnRegion {
    /// Anywhere on the surface
    #[default]
    Anywhere,
    /// Along the top edge
    Top,
    /// Along the bottom edge
    Bottom,
}

/// Parameters of `init_scene`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitParams {
    /// Number of live particles
    pub particles: usize,
    /// Spawn region
    pub spawn: SpawnRegion,
    /// Fixed RNG seed, random when absent
    pub seed: Option<u64>,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            particles: 40,
            spawn: SpawnRegion::Anywhere,
            seed: None,
        }
    }
}

/// Parameters of `update_scene`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateParams {
    /// Drift in cells per second, `[dx, dy]`
    pub velocity: [f32; 2],
    /// Random horizontal wobble in cells per second
    pub jitter: f32,
    /// Particle lifetime range in seconds
    pub lifetime: [f32; 2],
    /// Particles leaving the surface re-enter on the other side
    pub wrap: bool,
}

impl Default for UpdateParams {
    fn default() -> Self {
        Self {
            velocity: [0.0, 1.0],
            jitter: 0.0,
            lifetime: [2.0, 6.0],
            wrap: false,
        }
    }
}

/// Parameters of `render_scene`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    /// Flat background color
    pub background: SceneColor,
    /// Optional top-to-bottom gradient over the background
    pub gradient: Option<[SceneColor; 2]>,
    /// Particle colors, picked per particle
    pub palette: Vec<SceneColor>,
    /// Particle glyphs, picked per particle
    pub glyphs: String,
    /// Fade particles towards the background as they age
    pub fade: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            background: SceneColor(0, 0, 0),
            gradient: None,
            palette: vec![SceneColor(255, 255, 255)],
            glyphs: "*".to_string(),
            fade: false,
        }
    }
}

/// A validated scene plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDefinition {
    /// Unique scene name
    pub name: String,
    /// Category used by the settings filter
    pub category: String,
    /// Seeding parameters
    pub init: InitParams,
    /// Motion parameters
    pub update: UpdateParams,
    /// Drawing parameters
    pub render: RenderParams,
}

impl SceneDefinition {
    /// Parses and validates the contents of a scene plugin file.
    ///
    /// `file` is only used for error reporting.
    pub fn parse(file: &Path, text: &str) -> Result<Self, OrchestrationError> {
        let load_error = |reason: String| OrchestrationError::SceneLoad {
            file: file.to_path_buf(),
            reason,
        };

        let table: toml::Table = toml::from_str(text).map_err(|e| load_error(e.to_string()))?;

        let missing: Vec<&'static str> = IDENTIFIERS
            .into_iter()
            .filter(|key| {
                table
                    .get(*key)
                    .and_then(toml::Value::as_str)
                    .map_or(true, str::is_empty)
            })
            .chain(
                ENTRY_POINTS
                    .into_iter()
                    .filter(|key| !table.get(*key).is_some_and(toml::Value::is_table)),
            )
            .collect();
        if !missing.is_empty() {
            return Err(OrchestrationError::MissingEntryPoints {
                file: file.to_path_buf(),
                missing,
            });
        }

        let text_of = |key: &str| {
            table
                .get(key)
                .and_then(toml::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let section = |key: &str| {
            table
                .get(key)
                .cloned()
                .unwrap_or_else(|| toml::Value::Table(toml::Table::new()))
        };

        let init = section(INIT_ENTRY)
            .try_into::<InitParams>()
            .map_err(|e: toml::de::Error| load_error(format!("{INIT_ENTRY}: {e}")))?;
        let update = section(UPDATE_ENTRY)
            .try_into::<UpdateParams>()
            .map_err(|e: toml::de::Error| load_error(format!("{UPDATE_ENTRY}: {e}")))?;
        let mut render = section(RENDER_ENTRY)
            .try_into::<RenderParams>()
            .map_err(|e: toml::de::Error| load_error(format!("{RENDER_ENTRY}: {e}")))?;

        if init.particles > MAX_PARTICLES {
            return Err(load_error(format!(
                "{INIT_ENTRY}: particles must be at most {MAX_PARTICLES}"
            )));
        }
        let speeds = [update.velocity[0], update.velocity[1], update.jitter];
        if !speeds.iter().all(|v| v.is_finite() && v.abs() <= MAX_SPEED) {
            return Err(load_error(format!(
                "{UPDATE_ENTRY}: velocity and jitter must be finite and within {MAX_SPEED} cells/s"
            )));
        }
        let [shortest, longest] = update.lifetime;
        if !(shortest > 0.0 && shortest <= longest && longest <= MAX_LIFETIME) {
            return Err(load_error(format!(
                "{UPDATE_ENTRY}: lifetime must be a positive [min, max] range up to {MAX_LIFETIME} s"
            )));
        }
        if render.palette.is_empty() {
            render.palette = RenderParams::default().palette;
        }
        if render.glyphs.is_empty() {
            render.glyphs = RenderParams::default().glyphs;
        }

        Ok(Self {
            name: text_of(NAME_KEY),
            category: text_of(CATEGORY_KEY),
            init,
            update,
            render,
        })
    }
}
