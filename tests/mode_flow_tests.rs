//! Integration tests for the mode state machine.
//!
//! Drives `AppState` through key events and simulated frame deltas and
//! checks the transitions, the fallback loader and runtime fault eviction.

mod common;

use common::{
    menu_state, panicking_verticals, press, render_text, state_with, test_verticals, write_scene,
};
use crossterm::event::KeyCode;
use motibeam::config::Config;
use motibeam::registry::ModuleRegistry;
use motibeam::scenes::SceneManager;
use motibeam::settings::SettingsStore;
use motibeam::tui::mode::ModeKind;
use motibeam::tui::AppState;
use motibeam::verticals::VerticalOrderingConfig;
use ratatui::{backend::TestBackend, Terminal};
use std::fs;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn test_boot_advances_to_menu() {
    let mut state = AppState::new(
        Config::new(),
        SettingsStore::in_memory(),
        SceneManager::new(ModuleRegistry::new()),
        test_verticals(),
        Instant::now(),
        false,
    );
    assert_eq!(state.mode_kind(), ModeKind::Boot);
    assert!(render_text(&state, 80, 24).contains("Ambient Intelligence Projection"));

    state.update(Duration::from_secs(4));
    assert_eq!(state.mode_kind(), ModeKind::Boot);
    state.update(Duration::from_secs(1));
    assert_eq!(state.mode_kind(), ModeKind::Menu);
}

#[test]
fn test_digit_runs_vertical_and_enter_selects() {
    let mut state = menu_state(test_verticals());
    press(&mut state, KeyCode::Char('2'));
    assert_eq!(state.mode_kind(), ModeKind::RunningModule);
    assert_eq!(state.running_vertical(), Some("Security"));
    assert!(!state.showing_placeholder());

    press(&mut state, KeyCode::Esc);
    press(&mut state, KeyCode::Down);
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.running_vertical(), Some("Emergency"));
}

#[test]
fn test_skipped_scene_is_reported_at_startup() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene_ok.toml", "Aurora", "Nature");
    fs::write(dir.path().join("scene_broken.toml"), "SCENE_NAME = \"Broken\"\n").unwrap();

    let state = state_with(
        test_verticals(),
        SettingsStore::in_memory(),
        SceneManager::discover(dir.path()),
    );
    assert_eq!(state.mode_kind(), ModeKind::Menu);
    let status = state.status_message.clone().unwrap();
    assert!(status.contains("scene_broken.toml"), "{status}");
    assert!(render_text(&state, 120, 24).contains("scene_broken.toml"));
}

#[test]
fn test_unbound_digit_stays_in_menu() {
    let mut state = menu_state(test_verticals());
    press(&mut state, KeyCode::Char('8'));
    assert_eq!(state.mode_kind(), ModeKind::Menu);
}

#[test]
fn test_failing_constructor_shows_placeholder() {
    let mut state = menu_state(test_verticals());
    press(&mut state, KeyCode::Char('3'));

    assert_eq!(state.mode_kind(), ModeKind::RunningModule);
    assert!(state.showing_placeholder());
    assert!(state
        .status_message
        .as_deref()
        .is_some_and(|s| s.contains("'Emergency' failed to construct")));
    let screen = render_text(&state, 80, 24);
    assert!(screen.contains("Vertical Load Error"));
    assert!(screen.contains("Emergency"));
    assert!(screen.contains("projector lamp not detected"));

    // Same failure, same message
    press(&mut state, KeyCode::Esc);
    press(&mut state, KeyCode::Char('3'));
    assert!(render_text(&state, 80, 24).contains("projector lamp not detected"));
}

#[test]
fn test_placeholder_survives_updates() {
    let mut state = menu_state(test_verticals());
    press(&mut state, KeyCode::Char('3'));
    for _ in 0..10 {
        state.update(FRAME);
    }
    assert_eq!(state.mode_kind(), ModeKind::RunningModule);
}

#[test]
fn test_runtime_fault_returns_to_menu() {
    let mut state = menu_state(test_verticals());
    press(&mut state, KeyCode::Char('4'));
    assert_eq!(state.mode_kind(), ModeKind::RunningModule);

    state.update(FRAME);
    assert_eq!(state.mode_kind(), ModeKind::Menu);
    let status = state.status_message.clone().unwrap();
    assert!(status.contains("sensor bus disconnected"));
    assert!(render_text(&state, 100, 24).contains("sensor bus"));
}

#[test]
fn test_panic_in_update_returns_to_menu() {
    let mut state = menu_state(panicking_verticals());
    press(&mut state, KeyCode::Char('1'));
    assert_eq!(state.mode_kind(), ModeKind::RunningModule);

    state.update(FRAME);
    assert_eq!(state.mode_kind(), ModeKind::Menu);
    let status = state.status_message.clone().unwrap();
    assert!(status.contains("index out of bounds"), "{status}");

    state.update(FRAME);
    assert_eq!(state.mode_kind(), ModeKind::Menu);
}

#[test]
fn test_panic_in_render_is_a_runtime_fault() {
    let mut state = menu_state(panicking_verticals());
    press(&mut state, KeyCode::Char('2'));
    state.update(FRAME);
    assert_eq!(state.mode_kind(), ModeKind::RunningModule);

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut rendered = Ok(());
    terminal
        .draw(|f| rendered = motibeam::tui::render(f, &state))
        .unwrap();
    let err = rendered.unwrap_err();
    assert!(format!("{err:#}").contains("frame buffer poisoned"));

    state.handle_runtime_fault(&err);
    assert_eq!(state.mode_kind(), ModeKind::Menu);
    assert!(render_text(&state, 100, 24).contains("frame buffer poisoned"));
}

#[test]
fn test_panic_in_key_handling_returns_to_menu() {
    let mut state = menu_state(panicking_verticals());
    press(&mut state, KeyCode::Char('2'));
    press(&mut state, KeyCode::Char('x'));
    assert_eq!(state.mode_kind(), ModeKind::Menu);
    assert!(state
        .status_message
        .as_deref()
        .is_some_and(|s| s.contains("key decoder crashed")));
}

#[test]
fn test_module_finish_and_run_time_return_to_menu() {
    let mut state = menu_state(test_verticals());
    press(&mut state, KeyCode::Char('1'));
    press(&mut state, KeyCode::Char('f'));
    assert_eq!(state.mode_kind(), ModeKind::Menu);

    let mut config = Config::new();
    config.display.module_run_secs = 1;
    let mut state = AppState::new(
        config,
        SettingsStore::in_memory(),
        SceneManager::new(ModuleRegistry::new()),
        test_verticals(),
        Instant::now(),
        true,
    );
    press(&mut state, KeyCode::Char('1'));
    state.update(Duration::from_millis(600));
    assert_eq!(state.mode_kind(), ModeKind::RunningModule);
    state.update(Duration::from_millis(600));
    assert_eq!(state.mode_kind(), ModeKind::Menu);
}

#[test]
fn test_settings_open_adjust_and_close() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    let settings = SettingsStore::load(&path);
    let mut state = state_with(
        test_verticals(),
        settings,
        SceneManager::new(ModuleRegistry::new()),
    );

    press(&mut state, KeyCode::Char('s'));
    assert_eq!(state.mode_kind(), ModeKind::Settings);
    assert!(render_text(&state, 100, 24).contains("Brightness"));

    press(&mut state, KeyCode::Right);
    assert_eq!(state.settings.get_i64("Display", "brightness"), Some(80));
    let reloaded = SettingsStore::load(&path);
    assert_eq!(reloaded.get_i64("Display", "brightness"), Some(80));

    press(&mut state, KeyCode::Char('s'));
    assert_eq!(state.mode_kind(), ModeKind::Menu);
}

#[test]
fn test_ambient_scene_cycles_and_persists() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene_one.toml", "Fireplace", "Cozy");
    write_scene(dir.path(), "scene_two.toml", "Snowfall", "Seasonal");

    let mut state = state_with(
        test_verticals(),
        SettingsStore::in_memory(),
        SceneManager::discover(dir.path()),
    );
    press(&mut state, KeyCode::Char('b'));
    assert_eq!(state.mode_kind(), ModeKind::AmbientScene);
    assert_eq!(state.scenes.active_scene_name(), Some("Fireplace"));
    assert!(render_text(&state, 80, 24).contains("Scene: Fireplace"));

    state.update(FRAME);
    press(&mut state, KeyCode::Right);
    let switched = state.scenes.active_scene_name().unwrap().to_string();
    assert_ne!(switched, "Fireplace");
    assert_eq!(state.settings.active_scene(), Some(switched.as_str()));

    press(&mut state, KeyCode::Char('b'));
    assert_eq!(state.mode_kind(), ModeKind::Menu);
    assert!(state.scenes.active_scene_name().is_none());
}

#[test]
fn test_ambient_falls_back_to_first_scene() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene_only.toml", "Aurora", "Nature");

    let mut state = state_with(
        test_verticals(),
        SettingsStore::in_memory(),
        SceneManager::discover(dir.path()),
    );
    press(&mut state, KeyCode::Char('b'));
    assert_eq!(state.scenes.active_scene_name(), Some("Aurora"));
}

#[test]
fn test_ambient_with_auto_profile_starts_auto_demo() {
    let mut settings = SettingsStore::in_memory();
    settings.set("Demo", "enabled", true).unwrap();
    settings.set("Demo", "demo_profile", "Auto").unwrap();

    let mut state = state_with(
        VerticalOrderingConfig::builtin(),
        settings,
        SceneManager::new(ModuleRegistry::new()),
    );
    press(&mut state, KeyCode::Char('b'));
    assert_eq!(state.mode_kind(), ModeKind::AutoDemo);
    assert_eq!(state.running_vertical(), Some("Auto HUD"));
    assert!(render_text(&state, 80, 24).contains("AUTO DEMO"));
}

#[test]
fn test_auto_demo_rotates_after_dwell() {
    let mut config = Config::new();
    config.display.demo_dwell_secs = 2;
    let mut state = AppState::new(
        config,
        SettingsStore::in_memory(),
        SceneManager::new(ModuleRegistry::new()),
        test_verticals(),
        Instant::now(),
        true,
    );

    press(&mut state, KeyCode::Char('a'));
    assert_eq!(state.mode_kind(), ModeKind::AutoDemo);
    assert_eq!(state.running_vertical(), Some("Wellness"));

    state.update(Duration::from_secs(1));
    assert_eq!(state.running_vertical(), Some("Wellness"));
    state.update(Duration::from_secs(1));
    assert_eq!(state.running_vertical(), Some("Security"));

    press(&mut state, KeyCode::Esc);
    assert_eq!(state.mode_kind(), ModeKind::Menu);
}

#[test]
fn test_auto_demo_without_verticals_returns_to_menu() {
    let mut state = menu_state(VerticalOrderingConfig::default());
    press(&mut state, KeyCode::Char('a'));
    assert_eq!(state.mode_kind(), ModeKind::Menu);
    assert!(state.status_message.is_some());
}

#[test]
fn test_overlays_render_over_modes() {
    let mut state = menu_state(test_verticals());
    press(&mut state, KeyCode::Char('1'));
    press(&mut state, KeyCode::Char('m'));
    let screen = render_text(&state, 100, 30);
    assert!(screen.contains("Master Menu"));
    assert!(screen.contains("RunningModule"));

    press(&mut state, KeyCode::Char(' '));
    let screen = render_text(&state, 100, 30);
    assert!(screen.contains("Quick Settings"));
    assert!(!screen.contains("Master Menu"));
}

#[test]
fn test_quit_from_menu() {
    let mut state = menu_state(test_verticals());
    press(&mut state, KeyCode::Char('q'));
    assert!(state.should_quit);
}

#[test]
fn test_ambient_digit_jumps_to_scene() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene_one.toml", "Fireplace", "Cozy");
    write_scene(dir.path(), "scene_two.toml", "Snowfall", "Seasonal");

    let mut state = state_with(
        test_verticals(),
        SettingsStore::in_memory(),
        SceneManager::discover(dir.path()),
    );
    press(&mut state, KeyCode::Char('b'));
    let second = state.scenes.registry().descriptors()[1].name.clone();

    press(&mut state, KeyCode::Char('2'));
    assert_eq!(state.mode_kind(), ModeKind::AmbientScene);
    assert_eq!(state.scenes.active_scene_name(), Some(second.as_str()));
    assert_eq!(state.settings.active_scene(), Some(second.as_str()));

    press(&mut state, KeyCode::Char('9'));
    assert_eq!(state.scenes.active_scene_name(), Some(second.as_str()));
}

#[test]
fn test_settings_panel_survives_oversized_slider_value() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"Display": {"brightness": 9223372036854775807}}"#).unwrap();

    let mut state = state_with(
        test_verticals(),
        SettingsStore::load(&path),
        SceneManager::new(ModuleRegistry::new()),
    );
    press(&mut state, KeyCode::Char('s'));
    assert!(render_text(&state, 100, 24).contains("Brightness"));

    press(&mut state, KeyCode::Left);
    assert_eq!(state.settings.get_i64("Display", "brightness"), Some(95));
}
