//! Content modules: the verticals and scenes the shell hosts.
//!
//! Every piece of content, whether a built-in vertical screen, a scene plugin or
//! the load-error placeholder, implements [`ContentModule`]. The shell never
//! inspects what a module draws; it only drives the lifecycle.

pub mod builtin;
pub mod loader;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::time::Duration;

use crate::tui::Theme;

pub use loader::{ErrorFallbackLoader, LoadedModule, PlaceholderModule};

/// Which parts of the lifecycle a module implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Module advances its own state each frame.
    pub update: bool,
    /// Module draws itself.
    pub render: bool,
    /// Module drives itself and decides when it is done.
    pub run: bool,
}

impl Capabilities {
    /// Capabilities of a module the shell steps and draws each frame.
    pub const DRIVEN: Self = Self {
        update: true,
        render: true,
        run: false,
    };

    /// Whether the module can be hosted at all.
    ///
    /// A module must either run itself or expose both update and render.
    #[must_use]
    pub const fn satisfies_run_contract(&self) -> bool {
        self.run || (self.update && self.render)
    }
}

/// Result of stepping a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Keep the module on screen.
    Running,
    /// The module is done; the shell returns to the menu.
    Finished,
}

/// Arguments handed to every module constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleArgs {
    /// `false` when hosted by the shell. Hosted modules must not set up their
    /// own terminal or event loop.
    pub standalone: bool,
    /// Surface the module will be drawn into, when already known.
    pub surface: Option<Rect>,
}

impl ModuleArgs {
    /// Arguments for a module hosted inside the shell.
    #[must_use]
    pub const fn hosted(surface: Rect) -> Self {
        Self {
            standalone: false,
            surface: Some(surface),
        }
    }
}

/// Constructor for a content module.
pub type ModuleFactory = fn(&ModuleArgs) -> Result<Box<dyn ContentModule>>;

/// Contract every hosted module satisfies.
pub trait ContentModule {
    /// Display name used in logs and error screens.
    fn name(&self) -> &str;

    /// Lifecycle parts this module implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::DRIVEN
    }

    /// Prepares the module for drawing into `surface`.
    fn initialize(&mut self, surface: Rect) -> Result<()> {
        let _ = surface;
        Ok(())
    }

    /// Advances the module by `dt`.
    fn update(&mut self, dt: Duration) -> Result<ModuleStatus>;

    /// Draws the module into `area`.
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) -> Result<()>;

    /// Handles a key the global router passed through.
    fn handle_key(&mut self, key: KeyEvent) -> ModuleStatus {
        let _ = key;
        ModuleStatus::Running
    }

    /// How long a self-driving module wants to stay on screen.
    ///
    /// `None` lets the shell apply its configured default.
    fn run_duration(&self) -> Option<Duration> {
        None
    }
}
