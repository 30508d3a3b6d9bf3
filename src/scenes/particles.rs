//! Particle and gradient runtime for scene plugins.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{buffer::Buffer, layout::Rect, Frame};
use std::sync::Arc;
use std::time::Duration;

use crate::modules::{ContentModule, ModuleStatus};
use crate::registry::scene_file::{SceneColor, SceneDefinition, SpawnRegion};
use crate::tui::Theme;

#[derive(Debug, Clone, PartialEq)]
struct Particle {
    x: f32,
    y: f32,
    age: f32,
    life: f32,
    glyph: char,
    color: SceneColor,
}

/// Live state of one scene plugin.
#[derive(Debug)]
pub struct ParticleScene {
    definition: Arc<SceneDefinition>,
    particles: Vec<Particle>,
    rng: StdRng,
    width: f32,
    height: f32,
}

/// Samples `min..max`, or returns `min` when the range is empty or not finite.
fn uniform(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max > min && (max - min).is_finite() {
        rng.gen_range(min..max)
    } else {
        min
    }
}

impl ParticleScene {
    /// Creates an uninitialized scene.
    #[must_use]
    pub fn new(definition: Arc<SceneDefinition>) -> Self {
        let rng = definition
            .init
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            definition,
            particles: Vec::new(),
            rng,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Scene name.
    #[must_use]
    pub fn scene_name(&self) -> &str {
        &self.definition.name
    }

    /// Number of live particles.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Seeds particles for a surface of the given size.
    pub fn init_scene(&mut self, surface: Rect) {
        self.width = f32::from(surface.width.max(1));
        self.height = f32::from(surface.height.max(1));
        self.particles.clear();
        for _ in 0..self.definition.init.particles {
            let particle = self.spawn(true);
            self.particles.push(particle);
        }
    }

    fn spawn(&mut self, initial: bool) -> Particle {
        let def = Arc::clone(&self.definition);
        let (width, height) = (self.width, self.height);
        let rng = &mut self.rng;

        let x = uniform(rng, 0.0, width);
        let y = match (def.init.spawn, initial) {
            (SpawnRegion::Anywhere, _) | (_, true) => uniform(rng, 0.0, height),
            (SpawnRegion::Top, false) => 0.0,
            (SpawnRegion::Bottom, false) => height - 1.0,
        };
        let life = uniform(rng, def.update.lifetime[0], def.update.lifetime[1]);
        let age = if initial { uniform(rng, 0.0, life) } else { 0.0 };

        let glyph_count = def.render.glyphs.chars().count().max(1);
        let glyph = def
            .render
            .glyphs
            .chars()
            .nth(rng.gen_range(0..glyph_count))
            .unwrap_or('*');
        let color = def
            .render
            .palette
            .get(rng.gen_range(0..def.render.palette.len().max(1)))
            .copied()
            .unwrap_or(SceneColor(255, 255, 255));

        Particle {
            x,
            y,
            age,
            life,
            glyph,
            color,
        }
    }

    /// Advances every particle by `dt` seconds.
    pub fn update_scene(&mut self, dt: f32) {
        let [vx, vy] = self.definition.update.velocity;
        let jitter = self.definition.update.jitter;
        let wrap = self.definition.update.wrap;
        let (width, height) = (self.width, self.height);

        for idx in 0..self.particles.len() {
            let wobble = uniform(&mut self.rng, -jitter, jitter);
            let particle = &mut self.particles[idx];
            particle.age += dt;
            particle.x += (vx + wobble) * dt;
            particle.y += vy * dt;

            if wrap {
                particle.x = particle.x.rem_euclid(width);
                particle.y = particle.y.rem_euclid(height);
            }

            let outside = particle.x < 0.0
                || particle.x >= width
                || particle.y < 0.0
                || particle.y >= height;
            if particle.age >= particle.life || outside {
                self.particles[idx] = self.spawn(false);
            }
        }
    }

    fn row_background(&self, row: u16, rows: u16) -> SceneColor {
        let render = &self.definition.render;
        match render.gradient {
            Some([top, bottom]) if rows > 1 => {
                top.lerp(bottom, f32::from(row) / f32::from(rows - 1))
            }
            Some([top, _]) => top,
            None => render.background,
        }
    }

    /// Draws the scene into `area` of `buf`.
    ///
    /// Particle positions are scaled when `area` differs from the seeded size.
    pub fn render_scene(&self, buf: &mut Buffer, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        for row in 0..area.height {
            let bg = self.row_background(row, area.height).to_color();
            for col in 0..area.width {
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(' ').set_bg(bg);
                }
            }
        }

        let scale_x = f32::from(area.width) / self.width.max(1.0);
        let scale_y = f32::from(area.height) / self.height.max(1.0);
        let fade = self.definition.render.fade;

        for particle in &self.particles {
            let (px, py) = (particle.x * scale_x, particle.y * scale_y);
            if px < 0.0 || py < 0.0 {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (col, row) = (px as u16, py as u16);
            if col >= area.width || row >= area.height {
                continue;
            }

            let color = if fade {
                let bg = self.row_background(row, area.height);
                particle.color.lerp(bg, particle.age / particle.life.max(f32::EPSILON))
            } else {
                particle.color
            };

            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_char(particle.glyph).set_fg(color.to_color());
            }
        }
    }
}

impl ContentModule for ParticleScene {
    fn name(&self) -> &str {
        self.scene_name()
    }

    fn initialize(&mut self, surface: Rect) -> Result<()> {
        self.init_scene(surface);
        Ok(())
    }

    fn update(&mut self, dt: Duration) -> Result<ModuleStatus> {
        self.update_scene(dt.as_secs_f32());
        Ok(ModuleStatus::Running)
    }

    fn render(&self, f: &mut Frame, area: Rect, _theme: &Theme) -> Result<()> {
        self.render_scene(f.buffer_mut(), area);
        Ok(())
    }
}
