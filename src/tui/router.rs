//! Global command routing.
//!
//! Every input event passes through the router before the active mode sees
//! it. The router owns the overlay flags and the pointer-activity state, and
//! turns the four global keys into overlay toggles or mode requests. Modes
//! cannot shadow these keys.

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use std::time::{Duration, Instant};

use super::mode::ModeRequest;
use crate::shortcuts::{Action, ShortcutRegistry, GLOBAL};
use crate::verticals::VerticalOrderingConfig;

/// Default pointer idle time before the cursor hides.
pub const DEFAULT_CURSOR_IDLE: Duration = Duration::from_secs(3);

/// Commands honoured in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalCommand {
    /// Close the innermost overlay, or go back to the menu.
    ReturnToMenu,
    /// Show or hide the quick-settings overlay.
    ToggleQuickSettings,
    /// Run the vertical after the current one.
    CycleVertical,
    /// Show or hide the master-menu overlay.
    ToggleMasterMenu,
    /// Leave the application.
    Quit,
}

impl GlobalCommand {
    /// Maps a bound action to its global command.
    #[must_use]
    pub const fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::ReturnToMenu => Some(Self::ReturnToMenu),
            Action::ToggleQuickSettings => Some(Self::ToggleQuickSettings),
            Action::CycleVertical => Some(Self::CycleVertical),
            Action::ToggleMasterMenu => Some(Self::ToggleMasterMenu),
            Action::Quit => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Overlay flags. At most one overlay is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayState {
    /// Quick-settings overlay is open
    pub quick_settings: bool,
    /// Master-menu overlay is open
    pub master_menu: bool,
}

impl OverlayState {
    /// Whether any overlay is open.
    #[must_use]
    pub const fn any_open(&self) -> bool {
        self.quick_settings || self.master_menu
    }
}

/// Pointer and overlay state owned by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputActivityState {
    /// Time of the last key press or pointer event
    pub last_activity: Instant,
    /// Whether the pointer cursor should be drawn
    pub cursor_visible: bool,
    /// Last pointer position, `(column, row)`
    pub pointer: Option<(u16, u16)>,
    /// Open overlays
    pub overlays: OverlayState,
}

/// What happened to a routed event.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// The router handled the event; nothing else sees it.
    Consumed,
    /// The router asks the mode state machine for a transition.
    Request(ModeRequest),
    /// Not a global command; forward unchanged to the active mode.
    PassThrough(Event),
}

/// Routes input before mode handlers.
pub struct GlobalCommandRouter {
    activity: InputActivityState,
    idle: Duration,
    reported_visible: bool,
    shortcuts: ShortcutRegistry,
}

impl GlobalCommandRouter {
    /// Creates a router with the cursor visible and activity stamped at `now`.
    #[must_use]
    pub fn new(now: Instant, idle: Duration) -> Self {
        Self {
            activity: InputActivityState {
                last_activity: now,
                cursor_visible: true,
                pointer: None,
                overlays: OverlayState::default(),
            },
            idle,
            reported_visible: true,
            shortcuts: ShortcutRegistry::new(),
        }
    }

    /// Current activity state.
    #[must_use]
    pub const fn activity(&self) -> &InputActivityState {
        &self.activity
    }

    /// Current overlay flags.
    #[must_use]
    pub const fn overlays(&self) -> OverlayState {
        self.activity.overlays
    }

    /// Shortcut table shared with the mode handlers.
    #[must_use]
    pub const fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    /// Closes every overlay.
    pub fn close_overlays(&mut self) {
        self.activity.overlays = OverlayState::default();
    }

    /// Routes one event.
    ///
    /// `current_vertical` is the vertical TAB cycles from; `None` starts at
    /// the first entry.
    pub fn route(
        &mut self,
        event: &Event,
        now: Instant,
        verticals: &VerticalOrderingConfig,
        current_vertical: Option<&str>,
    ) -> RouteOutcome {
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return RouteOutcome::Consumed;
                }
                self.note_activity(now);
                match self.command_for(*key) {
                    Some(command) => self.dispatch(command, verticals, current_vertical),
                    None => RouteOutcome::PassThrough(event.clone()),
                }
            }
            Event::Mouse(mouse) => {
                self.note_activity(now);
                self.activity.pointer = Some((mouse.column, mouse.row));
                RouteOutcome::PassThrough(event.clone())
            }
            _ => RouteOutcome::PassThrough(event.clone()),
        }
    }

    fn command_for(&self, key: KeyEvent) -> Option<GlobalCommand> {
        self.shortcuts
            .lookup(GLOBAL, key)
            .and_then(GlobalCommand::from_action)
    }

    fn dispatch(
        &mut self,
        command: GlobalCommand,
        verticals: &VerticalOrderingConfig,
        current_vertical: Option<&str>,
    ) -> RouteOutcome {
        let overlays = &mut self.activity.overlays;
        match command {
            GlobalCommand::ReturnToMenu => {
                if overlays.quick_settings {
                    overlays.quick_settings = false;
                    RouteOutcome::Consumed
                } else if overlays.master_menu {
                    overlays.master_menu = false;
                    RouteOutcome::Consumed
                } else {
                    RouteOutcome::Request(ModeRequest::Menu)
                }
            }
            GlobalCommand::ToggleQuickSettings => {
                overlays.quick_settings = !overlays.quick_settings;
                if overlays.quick_settings {
                    overlays.master_menu = false;
                }
                tracing::debug!("quick settings overlay: {}", overlays.quick_settings);
                RouteOutcome::Consumed
            }
            GlobalCommand::ToggleMasterMenu => {
                overlays.master_menu = !overlays.master_menu;
                if overlays.master_menu {
                    overlays.quick_settings = false;
                }
                tracing::debug!("master menu overlay: {}", overlays.master_menu);
                RouteOutcome::Consumed
            }
            GlobalCommand::CycleVertical => {
                match verticals.next_after(current_vertical.unwrap_or_default()) {
                    Some(entry) => {
                        tracing::debug!("cycling to vertical '{}'", entry.display_name);
                        RouteOutcome::Request(ModeRequest::RunVertical(entry.clone()))
                    }
                    None => {
                        tracing::warn!("no verticals available to cycle");
                        RouteOutcome::Consumed
                    }
                }
            }
            GlobalCommand::Quit => RouteOutcome::Request(ModeRequest::Quit),
        }
    }

    fn note_activity(&mut self, now: Instant) {
        self.activity.last_activity = now;
        self.activity.cursor_visible = true;
    }

    /// Whether the pointer has been idle longer than the idle threshold.
    #[must_use]
    pub fn should_hide_cursor(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.activity.last_activity) > self.idle
    }

    /// Applies the idle rule and reports a visibility change.
    ///
    /// Returns `Some(visible)` only when visibility differs from the last
    /// reported value.
    pub fn refresh_cursor(&mut self, now: Instant) -> Option<bool> {
        if self.activity.cursor_visible && self.should_hide_cursor(now) {
            self.activity.cursor_visible = false;
        }
        if self.activity.cursor_visible == self.reported_visible {
            return None;
        }
        self.reported_visible = self.activity.cursor_visible;
        tracing::debug!("cursor visible: {}", self.reported_visible);
        Some(self.reported_visible)
    }
}
