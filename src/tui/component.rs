//! Component trait pattern for shell screens.
//!
//! Screens with their own navigation state (the main menu, the settings
//! panel) receive already-resolved [`Action`]s, read shared data through a
//! context, and report what the parent should do through an event.

use ratatui::{layout::Rect, Frame};

use crate::shortcuts::Action;
use crate::tui::Theme;

/// A screen that keeps its own state and reads shared data from a context.
pub trait Component {
    /// Shared data the component reads but does not own
    type Context;

    /// Event type this component can emit
    type Event;

    /// Handle a bound action.
    ///
    /// Returns `Some(Event)` when the parent has to act on it.
    fn handle_action(&mut self, action: Action, context: &Self::Context) -> Option<Self::Event>;

    /// Render the component within `area`.
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, context: &Self::Context);

    /// Whether the component has finished and should be closed.
    fn should_close(&self) -> bool {
        false
    }
}
