//! Main menu input handler.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::shortcuts::MENU;
use crate::tui::menu::MenuEvent;
use crate::tui::mode::ModeRequest;
use crate::tui::{AppState, Component};

/// Handle input for the main menu.
pub fn handle_menu_input(state: &mut AppState, key: KeyEvent) -> Result<()> {
    if let KeyCode::Char(digit) = key.code {
        if digit.is_ascii_digit() && !key.modifiers.contains(KeyModifiers::CONTROL) {
            match state.verticals.by_key(digit).cloned() {
                Some(entry) => state.apply(ModeRequest::RunVertical(entry)),
                None => tracing::debug!("no vertical bound to '{digit}'"),
            }
            return Ok(());
        }
    }

    let Some(action) = state.router.shortcuts().lookup(MENU, key) else {
        return Ok(());
    };

    match state.menu.handle_action(action, &state.verticals) {
        Some(MenuEvent::Run(entry)) => state.apply(ModeRequest::RunVertical(entry)),
        Some(MenuEvent::OpenSettings) => state.apply(ModeRequest::Settings),
        Some(MenuEvent::OpenAmbient) => state.apply(ModeRequest::Ambient),
        Some(MenuEvent::StartAutoDemo) => state.apply(ModeRequest::AutoDemo { profile: None }),
        Some(MenuEvent::RescanScenes) => {
            state.scenes.rescan();
            state.settings_panel.set_scenes(state.scenes.scene_list());
            let registry = state.scenes.registry();
            let (count, skipped) = (registry.len(), registry.skipped().len());
            state.set_status(format!("Found {count} scene(s), {skipped} skipped"));
        }
        Some(MenuEvent::Quit) => state.apply(ModeRequest::Quit),
        None => {}
    }
    Ok(())
}
