//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use anyhow::{bail, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use motibeam::config::Config;
use motibeam::modules::{ContentModule, ModuleArgs, ModuleStatus};
use motibeam::registry::ModuleRegistry;
use motibeam::scenes::SceneManager;
use motibeam::settings::SettingsStore;
use motibeam::tui::{AppState, Theme};
use motibeam::verticals::{RawVerticalEntry, VerticalOrderingConfig};

/// Writes a complete scene plugin.
pub fn write_scene(dir: &Path, file: &str, name: &str, category: &str) {
    let text = format!(
        r##"
SCENE_NAME = "{name}"
SCENE_CATEGORY = "{category}"

[init_scene]
particles = 10
seed = 3

[update_scene]
velocity = [0.0, 2.0]

[render_scene]
background = "#000000"
palette = ["#ffffff"]
"##
    );
    fs::write(dir.join(file), text).unwrap();
}

/// Module that counts its updates and finishes on `f`.
pub struct CountingModule {
    name: &'static str,
    pub updates: usize,
}

impl ContentModule for CountingModule {
    fn name(&self) -> &str {
        self.name
    }

    fn update(&mut self, _dt: Duration) -> Result<ModuleStatus> {
        self.updates += 1;
        Ok(ModuleStatus::Running)
    }

    fn render(&self, f: &mut Frame, area: Rect, _theme: &Theme) -> Result<()> {
        f.render_widget(Paragraph::new(format!("{} running", self.name)), area);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModuleStatus {
        if key.code == KeyCode::Char('f') {
            ModuleStatus::Finished
        } else {
            ModuleStatus::Running
        }
    }
}

/// Module whose update always fails.
pub struct FaultingModule;

impl ContentModule for FaultingModule {
    fn name(&self) -> &str {
        "Faulty"
    }

    fn update(&mut self, _dt: Duration) -> Result<ModuleStatus> {
        bail!("sensor bus disconnected")
    }

    fn render(&self, _f: &mut Frame, _area: Rect, _theme: &Theme) -> Result<()> {
        Ok(())
    }
}

/// Module that panics while updating.
pub struct PanicOnUpdate;

impl ContentModule for PanicOnUpdate {
    fn name(&self) -> &str {
        "Panicky"
    }

    fn update(&mut self, _dt: Duration) -> Result<ModuleStatus> {
        let readings: Vec<u8> = Vec::new();
        let slot = readings.len() + 3;
        Ok(if readings[slot] > 0 {
            ModuleStatus::Finished
        } else {
            ModuleStatus::Running
        })
    }

    fn render(&self, _f: &mut Frame, _area: Rect, _theme: &Theme) -> Result<()> {
        Ok(())
    }
}

/// Module that panics while drawing, or on `x`.
pub struct PanicOnRender;

impl ContentModule for PanicOnRender {
    fn name(&self) -> &str {
        "Brittle"
    }

    fn update(&mut self, _dt: Duration) -> Result<ModuleStatus> {
        Ok(ModuleStatus::Running)
    }

    fn render(&self, _f: &mut Frame, _area: Rect, _theme: &Theme) -> Result<()> {
        panic!("frame buffer poisoned")
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModuleStatus {
        assert!(key.code != KeyCode::Char('x'), "key decoder crashed");
        ModuleStatus::Running
    }
}

pub fn alpha_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(CountingModule {
        name: "Alpha",
        updates: 0,
    }))
}

pub fn beta_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(CountingModule {
        name: "Beta",
        updates: 0,
    }))
}

pub fn failing_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    bail!("projector lamp not detected")
}

pub fn panicking_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    panic!("constructor exploded")
}

pub fn faulting_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(FaultingModule))
}

pub fn panic_on_update_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(PanicOnUpdate))
}

pub fn panic_on_render_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(PanicOnRender))
}

/// Verticals whose modules panic once running.
pub fn panicking_verticals() -> VerticalOrderingConfig {
    VerticalOrderingConfig::from_raw(vec![
        RawVerticalEntry::new('1', "Wellness", Some(panic_on_update_factory)),
        RawVerticalEntry::new('2', "Security", Some(panic_on_render_factory)),
    ])
}

/// Four verticals: two healthy, one that fails to construct, one that faults.
pub fn test_verticals() -> VerticalOrderingConfig {
    VerticalOrderingConfig::from_raw(vec![
        RawVerticalEntry::new('1', "Wellness", Some(alpha_factory)),
        RawVerticalEntry::new('2', "Security", Some(beta_factory)),
        RawVerticalEntry::new('3', "Emergency", Some(failing_factory)),
        RawVerticalEntry::new('4', "Industrial", Some(faulting_factory)),
    ])
}

/// Shell in the menu with in-memory settings and no scenes.
pub fn menu_state(verticals: VerticalOrderingConfig) -> AppState {
    state_with(verticals, SettingsStore::in_memory(), SceneManager::new(ModuleRegistry::new()))
}

pub fn state_with(
    verticals: VerticalOrderingConfig,
    settings: SettingsStore,
    scenes: SceneManager,
) -> AppState {
    AppState::new(Config::new(), settings, scenes, verticals, Instant::now(), true)
}

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn press(state: &mut AppState, code: KeyCode) {
    state.handle_event(&key(code), Instant::now());
}

/// Renders `state` into an off-screen buffer and returns its text.
pub fn render_text(state: &AppState, width: u16, height: u16) -> String {
    let mut terminal =
        ratatui::Terminal::new(ratatui::backend::TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|f| motibeam::tui::render(f, state).unwrap())
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(ratatui::buffer::Cell::symbol)
        .collect()
}
