//! Ambient scene input handler.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::settings::SECTION_SCENES;
use crate::shortcuts::{Action, AMBIENT};
use crate::tui::mode::ModeRequest;
use crate::tui::AppState;

/// Handle input for the ambient scene.
pub fn handle_ambient_input(state: &mut AppState, key: KeyEvent) -> Result<()> {
    // Plain digits: most terminals cannot report Ctrl+digit
    if let (KeyCode::Char(digit @ '1'..='9'), KeyModifiers::NONE) = (key.code, key.modifiers) {
        let index = digit as usize - '1' as usize;
        let name = state
            .scenes
            .registry()
            .descriptors()
            .get(index)
            .map(|d| d.name.clone());
        return match name {
            Some(name) => select_scene(state, &name),
            None => Ok(()),
        };
    }

    match state.router.shortcuts().lookup(AMBIENT, key) {
        Some(Action::NextScene) => cycle_scene(state, 1),
        Some(Action::PreviousScene) => cycle_scene(state, -1),
        Some(Action::CloseAmbient) => {
            state.apply(ModeRequest::Menu);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn cycle_scene(state: &mut AppState, offset: isize) -> Result<()> {
    match state.scenes.scene_at_offset(offset) {
        Some(name) => select_scene(state, &name),
        None => Ok(()),
    }
}

/// Activates `name` and remembers it as the ambient scene.
fn select_scene(state: &mut AppState, name: &str) -> Result<()> {
    if state.scenes.set_active_scene(name, state.surface) {
        state.settings.set(SECTION_SCENES, "active_scene", name)?;
    }
    Ok(())
}
