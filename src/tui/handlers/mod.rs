//! Input handler modules for the shell modes.
//!
//! Handlers only see events the global router passed through.

pub mod ambient;
pub mod menu;
pub mod settings;

use anyhow::Result;
use crossterm::event::{Event, KeyEvent};

use super::mode::{AppMode, ModeRequest};
use super::AppState;

pub use ambient::handle_ambient_input;
pub use menu::handle_menu_input;
pub use settings::handle_settings_input;

/// Hands a passed-through event to the live mode.
pub fn handle_mode_event(state: &mut AppState, event: &Event) -> Result<()> {
    let Event::Key(key) = event else {
        return Ok(());
    };
    handle_mode_key(state, *key)
}

fn handle_mode_key(state: &mut AppState, key: KeyEvent) -> Result<()> {
    match &state.mode {
        AppMode::Boot(_) => {
            tracing::debug!("boot skipped by key press");
            state.apply(ModeRequest::Menu);
            Ok(())
        }
        AppMode::Menu => handle_menu_input(state, key),
        AppMode::Settings => handle_settings_input(state, key),
        AppMode::AmbientScene => handle_ambient_input(state, key),
        AppMode::RunningModule(_) | AppMode::AutoDemo(_) => {
            state.forward_key_to_module(key);
            Ok(())
        }
    }
}
