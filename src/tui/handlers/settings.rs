//! Settings panel input handler.

use anyhow::Result;
use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::settings::{SECTION_SCENES, SECTION_VISUALS};
use crate::shortcuts::SETTINGS;
use crate::tui::mode::ModeRequest;
use crate::tui::settings_panel::SettingsEvent;
use crate::tui::{AppState, Component, Theme};

/// Handle input for the settings panel using the Component trait pattern.
pub fn handle_settings_input(state: &mut AppState, key: KeyEvent) -> Result<()> {
    let Some(action) = state.router.shortcuts().lookup(SETTINGS, key) else {
        return Ok(());
    };

    match state.settings_panel.handle_action(action, &state.settings) {
        Some(SettingsEvent::Changed {
            section,
            key,
            value,
        }) => apply_setting(state, section, key, value),
        Some(SettingsEvent::Reboot) => {
            tracing::info!("reboot requested from settings");
            state.set_status("Reboot requested".to_string());
            Ok(())
        }
        Some(SettingsEvent::FactoryReset) => {
            let saved = state.settings.reset_to_defaults();
            state.theme = Theme::from_setting(state.settings.get_str(SECTION_VISUALS, "theme"));
            state.set_status("Settings restored to defaults".to_string());
            saved
        }
        Some(SettingsEvent::Close) => {
            state.apply(ModeRequest::Menu);
            Ok(())
        }
        None => Ok(()),
    }
}

/// Writes one setting and applies its side effects.
///
/// Side effects run even when persisting fails; the save error is returned
/// afterwards.
pub fn apply_setting(
    state: &mut AppState,
    section: &str,
    key: &str,
    value: Value,
) -> Result<()> {
    let saved = state.settings.set(section, key, value.clone());

    match (section, key) {
        (SECTION_SCENES, "active_scene") => {
            if let Some(name) = value.as_str() {
                state.scenes.set_active_scene(name, state.surface);
            }
        }
        (SECTION_VISUALS, "theme") => {
            state.theme = Theme::from_setting(value.as_str());
        }
        _ => {}
    }

    saved
}
