//! Centralized shortcut and action system.
//!
//! Key bindings for every input context live here, so the router, the mode
//! handlers and the help text all agree on which key does what.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Context checked before any mode handler.
pub const GLOBAL: &str = "global";
/// Main menu context.
pub const MENU: &str = "menu";
/// Settings panel context.
pub const SETTINGS: &str = "settings";
/// Ambient scene context.
pub const AMBIENT: &str = "ambient";

/// Every action reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === GLOBAL ===
    ReturnToMenu,
    ToggleQuickSettings,
    CycleVertical,
    ToggleMasterMenu,
    Quit,

    // === MENU ===
    MenuUp,
    MenuDown,
    MenuSelect,
    OpenSettings,
    OpenAmbient,
    StartAutoDemo,
    RescanScenes,

    // === SETTINGS ===
    NextSection,
    PreviousSection,
    NextControl,
    PreviousControl,
    Decrease,
    Increase,
    Activate,
    CloseSettings,

    // === AMBIENT ===
    NextScene,
    PreviousScene,
    CloseAmbient,
}

impl Action {
    /// Stable identifier used in logs.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::ReturnToMenu => "return_to_menu",
            Self::ToggleQuickSettings => "toggle_quick_settings",
            Self::CycleVertical => "cycle_vertical",
            Self::ToggleMasterMenu => "toggle_master_menu",
            Self::Quit => "quit",

            Self::MenuUp => "menu_up",
            Self::MenuDown => "menu_down",
            Self::MenuSelect => "menu_select",
            Self::OpenSettings => "open_settings",
            Self::OpenAmbient => "open_ambient",
            Self::StartAutoDemo => "start_auto_demo",
            Self::RescanScenes => "rescan_scenes",

            Self::NextSection => "next_section",
            Self::PreviousSection => "previous_section",
            Self::NextControl => "next_control",
            Self::PreviousControl => "previous_control",
            Self::Decrease => "decrease",
            Self::Increase => "increase",
            Self::Activate => "activate",
            Self::CloseSettings => "close_settings",

            Self::NextScene => "next_scene",
            Self::PreviousScene => "previous_scene",
            Self::CloseAmbient => "close_ambient",
        }
    }
}

/// A key binding (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Key code
    pub code: KeyCode,
    /// Required modifiers
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key binding from a KeyEvent.
    #[must_use]
    pub const fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Maps `(context, key)` to an action.
pub struct ShortcutRegistry {
    bindings: HashMap<(String, KeyBinding), Action>,
}

impl ShortcutRegistry {
    /// Create a new shortcut registry with default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            bindings: HashMap::new(),
        };

        registry.register_global_shortcuts();
        registry.register_menu_shortcuts();
        registry.register_settings_shortcuts();
        registry.register_ambient_shortcuts();
        registry
    }

    fn register_global_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        self.register(GLOBAL, K::Esc, M::NONE, Action::ReturnToMenu);
        self.register(GLOBAL, K::Char(' '), M::NONE, Action::ToggleQuickSettings);
        self.register(GLOBAL, K::Tab, M::NONE, Action::CycleVertical);
        self.register(GLOBAL, K::Char('m'), M::NONE, Action::ToggleMasterMenu);
        self.register(GLOBAL, K::Char('M'), M::SHIFT, Action::ToggleMasterMenu);
        self.register(GLOBAL, K::Char('c'), M::CONTROL, Action::Quit);
        self.register(GLOBAL, K::Char('q'), M::CONTROL, Action::Quit);
    }

    fn register_menu_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        self.register(MENU, K::Up, M::NONE, Action::MenuUp);
        self.register(MENU, K::Char('k'), M::NONE, Action::MenuUp);
        self.register(MENU, K::Down, M::NONE, Action::MenuDown);
        self.register(MENU, K::Char('j'), M::NONE, Action::MenuDown);
        self.register(MENU, K::Enter, M::NONE, Action::MenuSelect);
        self.register(MENU, K::Char('s'), M::NONE, Action::OpenSettings);
        self.register(MENU, K::Char('S'), M::SHIFT, Action::OpenSettings);
        self.register(MENU, K::Char('b'), M::NONE, Action::OpenAmbient);
        self.register(MENU, K::Char('B'), M::SHIFT, Action::OpenAmbient);
        self.register(MENU, K::Char('a'), M::NONE, Action::StartAutoDemo);
        self.register(MENU, K::Char('A'), M::SHIFT, Action::StartAutoDemo);
        self.register(MENU, K::Char('r'), M::NONE, Action::RescanScenes);
        self.register(MENU, K::Char('q'), M::NONE, Action::Quit);
    }

    fn register_settings_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        self.register(SETTINGS, K::PageDown, M::NONE, Action::NextSection);
        self.register(SETTINGS, K::Char(']'), M::NONE, Action::NextSection);
        self.register(SETTINGS, K::PageUp, M::NONE, Action::PreviousSection);
        self.register(SETTINGS, K::Char('['), M::NONE, Action::PreviousSection);
        self.register(SETTINGS, K::Down, M::NONE, Action::NextControl);
        self.register(SETTINGS, K::Char('j'), M::NONE, Action::NextControl);
        self.register(SETTINGS, K::Up, M::NONE, Action::PreviousControl);
        self.register(SETTINGS, K::Char('k'), M::NONE, Action::PreviousControl);
        self.register(SETTINGS, K::Left, M::NONE, Action::Decrease);
        self.register(SETTINGS, K::Char('h'), M::NONE, Action::Decrease);
        self.register(SETTINGS, K::Right, M::NONE, Action::Increase);
        self.register(SETTINGS, K::Char('l'), M::NONE, Action::Increase);
        self.register(SETTINGS, K::Enter, M::NONE, Action::Activate);
        self.register(SETTINGS, K::Char('s'), M::NONE, Action::CloseSettings);
        self.register(SETTINGS, K::Char('S'), M::SHIFT, Action::CloseSettings);
    }

    fn register_ambient_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        self.register(AMBIENT, K::Right, M::NONE, Action::NextScene);
        self.register(AMBIENT, K::Left, M::NONE, Action::PreviousScene);
        self.register(AMBIENT, K::Char('b'), M::NONE, Action::CloseAmbient);
        self.register(AMBIENT, K::Char('B'), M::SHIFT, Action::CloseAmbient);
    }

    fn register(&mut self, context: &str, code: KeyCode, modifiers: KeyModifiers, action: Action) {
        let binding = KeyBinding::new(code, modifiers);
        self.bindings.insert((context.to_string(), binding), action);
    }

    /// Look up an action for a given context and key event.
    #[must_use]
    pub fn lookup(&self, context: &str, event: KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(event);
        self.bindings.get(&(context.to_string(), binding)).copied()
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}
