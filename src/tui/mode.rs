//! Mode state machine.
//!
//! Exactly one [`AppMode`] is live at a time. A mode that owns a module owns
//! it by value, so leaving the mode drops the module.

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use std::fmt;
use std::time::Duration;

use super::boot::BootSequence;
use super::AppState;
use crate::config::DisplayConfig;
use crate::error::{OrchestrationError, Recovery};
use crate::modules::loader::{catch_fault, truncate_error, MAX_ERROR_CHARS};
use crate::modules::{ContentModule, ErrorFallbackLoader, ModuleArgs, ModuleStatus};
use crate::verticals::VerticalEntry;

/// Discriminant of [`AppMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// Boot screen
    Boot,
    /// Main menu
    Menu,
    /// A single vertical
    RunningModule,
    /// Settings panel
    Settings,
    /// Ambient background scene
    AmbientScene,
    /// Rotating vertical showcase
    AutoDemo,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boot => "Boot",
            Self::Menu => "Menu",
            Self::RunningModule => "RunningModule",
            Self::Settings => "Settings",
            Self::AmbientScene => "AmbientScene",
            Self::AutoDemo => "AutoDemo",
        };
        f.write_str(name)
    }
}

/// Transition requested by the router or a mode handler.
#[derive(Debug, Clone)]
pub enum ModeRequest {
    /// Go back to the menu.
    Menu,
    /// Run one vertical.
    RunVertical(VerticalEntry),
    /// Open the settings panel.
    Settings,
    /// Show the ambient scene.
    Ambient,
    /// Start the auto demo, optionally at the vertical matching a profile.
    AutoDemo {
        /// Profile whose vertical the rotation starts at
        profile: Option<String>,
    },
    /// Leave the application.
    Quit,
}

/// A vertical on screen.
pub struct RunningModule {
    /// Display name of the vertical
    pub name: String,
    /// Live module, a placeholder when loading failed
    pub module: Box<dyn ContentModule>,
    /// Time on screen
    pub elapsed: Duration,
    /// Whether `module` is a load-error placeholder
    pub placeholder: bool,
}

impl RunningModule {
    /// Loads `entry` through the fallback loader.
    #[must_use]
    pub fn load(entry: &VerticalEntry, surface: Rect) -> (Self, Option<OrchestrationError>) {
        let loaded = ErrorFallbackLoader::load(
            &entry.display_name,
            entry.constructor,
            &ModuleArgs::hosted(surface),
        );
        let placeholder = loaded.is_placeholder();
        (
            Self {
                name: entry.display_name.clone(),
                module: loaded.module,
                elapsed: Duration::ZERO,
                placeholder,
            },
            loaded.fault,
        )
    }

    fn step(&mut self, dt: Duration) -> anyhow::Result<ModuleStatus> {
        self.elapsed += dt;
        let module = &mut self.module;
        catch_fault(|| module.update(dt))
    }
}

/// Auto-demo rotation state.
pub struct AutoDemo {
    /// Vertical on screen
    pub current: RunningModule,
    /// Time each vertical stays up
    pub dwell: Duration,
}

/// The live mode.
pub enum AppMode {
    /// Boot screen with its progress
    Boot(BootSequence),
    /// Main menu
    Menu,
    /// One vertical
    RunningModule(RunningModule),
    /// Settings panel
    Settings,
    /// Ambient scene, the scene itself lives in the scene manager
    AmbientScene,
    /// Rotating verticals
    AutoDemo(AutoDemo),
}

impl AppMode {
    /// Discriminant of this mode.
    #[must_use]
    pub const fn kind(&self) -> ModeKind {
        match self {
            Self::Boot(_) => ModeKind::Boot,
            Self::Menu => ModeKind::Menu,
            Self::RunningModule(_) => ModeKind::RunningModule,
            Self::Settings => ModeKind::Settings,
            Self::AmbientScene => ModeKind::AmbientScene,
            Self::AutoDemo(_) => ModeKind::AutoDemo,
        }
    }
}

impl AppState {
    /// Discriminant of the live mode.
    #[must_use]
    pub const fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    /// Vertical TAB cycles from.
    ///
    /// The running vertical, or the one that ran last when back in the menu.
    #[must_use]
    pub fn current_vertical(&self) -> Option<&str> {
        match &self.mode {
            AppMode::RunningModule(running) => Some(running.name.as_str()),
            AppMode::AutoDemo(demo) => Some(demo.current.name.as_str()),
            _ => self.last_vertical.as_deref(),
        }
    }

    /// Display name of the vertical on screen, if any.
    #[must_use]
    pub fn running_vertical(&self) -> Option<&str> {
        match &self.mode {
            AppMode::RunningModule(running) => Some(running.name.as_str()),
            AppMode::AutoDemo(demo) => Some(demo.current.name.as_str()),
            _ => None,
        }
    }

    /// Whether the vertical on screen is a load-error placeholder.
    #[must_use]
    pub fn showing_placeholder(&self) -> bool {
        match &self.mode {
            AppMode::RunningModule(running) => running.placeholder,
            AppMode::AutoDemo(demo) => demo.current.placeholder,
            _ => false,
        }
    }

    /// Applies a transition request.
    pub fn apply(&mut self, request: ModeRequest) {
        match request {
            ModeRequest::Menu => self.enter_menu(),
            ModeRequest::RunVertical(entry) => self.run_vertical(&entry),
            ModeRequest::Settings => self.enter_settings(),
            ModeRequest::Ambient => self.enter_ambient(),
            ModeRequest::AutoDemo { profile } => self.start_auto_demo(profile.as_deref()),
            ModeRequest::Quit => {
                tracing::info!("quit requested in {}", self.mode_kind());
                self.should_quit = true;
            }
        }
    }

    fn switch_to(&mut self, mode: AppMode) {
        let from = self.mode_kind();
        let to = mode.kind();
        if from != to {
            tracing::info!("mode: {from} -> {to}");
        }
        if from == ModeKind::AmbientScene && to != ModeKind::AmbientScene {
            self.scenes.clear_active();
        }
        self.mode = mode;
    }

    fn enter_menu(&mut self) {
        if let Some(name) = self.running_vertical().map(str::to_owned) {
            self.last_vertical = Some(name);
        }
        self.switch_to(AppMode::Menu);
    }

    fn run_vertical(&mut self, entry: &VerticalEntry) {
        let (running, fault) = RunningModule::load(entry, self.surface);
        if let Some(fault) = fault {
            self.recover(&fault);
        }
        self.last_vertical = Some(entry.display_name.clone());
        if let Some(idx) = self.verticals.position(&entry.display_name) {
            self.menu.select(idx);
        }
        self.switch_to(AppMode::RunningModule(running));
    }

    fn enter_settings(&mut self) {
        self.settings_panel.open();
        self.switch_to(AppMode::Settings);
    }

    fn enter_ambient(&mut self) {
        if self.settings.demo_enabled() && self.settings.demo_profile() == Some("Auto") {
            tracing::info!("demo profile 'Auto' enabled, starting auto demo");
            self.start_auto_demo(Some("Auto"));
            return;
        }

        self.scenes.clear_active();
        let wanted = self.settings.active_scene().map(str::to_owned);
        let activated = wanted
            .as_deref()
            .is_some_and(|name| self.scenes.set_active_scene(name, self.surface));

        if !activated {
            match self.scenes.scene_at_offset(0) {
                Some(first) => {
                    tracing::warn!(
                        "scene '{}' unavailable, using '{first}'",
                        wanted.as_deref().unwrap_or_default()
                    );
                    self.scenes.set_active_scene(&first, self.surface);
                }
                None => self.set_status("No scenes found".to_string()),
            }
        }

        self.switch_to(AppMode::AmbientScene);
    }

    fn start_auto_demo(&mut self, profile: Option<&str>) {
        let first = profile
            .and_then(|p| self.verticals.starting_with(p))
            .or_else(|| self.verticals.active_entries().first())
            .cloned();

        let Some(entry) = first else {
            tracing::warn!("auto demo requested with no verticals available");
            self.set_status("No verticals available".to_string());
            self.switch_to(AppMode::Menu);
            return;
        };

        let (current, _) = RunningModule::load(&entry, self.surface);
        self.last_vertical = Some(entry.display_name.clone());
        let dwell = self.config.display.demo_dwell();
        self.switch_to(AppMode::AutoDemo(AutoDemo { current, dwell }));
    }

    fn advance_auto_demo(&mut self) {
        let Some(current) = self.running_vertical().map(str::to_owned) else {
            return;
        };
        let Some(entry) = self.verticals.next_after(&current).cloned() else {
            self.enter_menu();
            return;
        };
        tracing::info!("auto demo: {current} -> {}", entry.display_name);
        let (next, _) = RunningModule::load(&entry, self.surface);
        self.last_vertical = Some(entry.display_name.clone());
        if let AppMode::AutoDemo(demo) = &mut self.mode {
            demo.current = next;
        }
    }

    /// Forwards a key to the module on screen.
    pub(crate) fn forward_key_to_module(&mut self, key: KeyEvent) {
        let outcome = match &mut self.mode {
            AppMode::RunningModule(running) => {
                catch_fault(|| Ok(running.module.handle_key(key)))
            }
            AppMode::AutoDemo(demo) => catch_fault(|| Ok(demo.current.module.handle_key(key))),
            _ => return,
        };
        match outcome {
            Ok(ModuleStatus::Running) => {}
            Ok(ModuleStatus::Finished) if self.mode_kind() == ModeKind::AutoDemo => {
                self.advance_auto_demo();
            }
            Ok(ModuleStatus::Finished) => self.enter_menu(),
            Err(err) => self.handle_runtime_fault(&err),
        }
    }

    /// Advances the live mode by `dt`.
    ///
    /// Faults from modules or scenes return the shell to the menu.
    pub fn update(&mut self, dt: Duration) {
        let default_run = self.config.display.module_run_duration();
        let speed = self.settings.animation_speed_factor();

        match &mut self.mode {
            AppMode::Boot(boot) => {
                if boot.advance(dt) {
                    self.enter_menu();
                }
            }
            AppMode::Menu | AppMode::Settings => {}
            AppMode::RunningModule(running) => {
                let limit = running.module.run_duration().unwrap_or(default_run);
                match running.step(dt) {
                    Ok(ModuleStatus::Finished) => {
                        tracing::info!("module '{}' finished", running.name);
                        self.enter_menu();
                    }
                    Ok(ModuleStatus::Running) if running.elapsed >= limit => {
                        tracing::info!("module '{}' reached its run time", running.name);
                        self.enter_menu();
                    }
                    Ok(ModuleStatus::Running) => {}
                    Err(err) => self.handle_runtime_fault(&err),
                }
            }
            AppMode::AmbientScene => {
                let scenes = &mut self.scenes;
                if let Err(err) = catch_fault(|| scenes.update_active_scene(dt.mul_f32(speed))) {
                    self.handle_runtime_fault(&err);
                }
            }
            AppMode::AutoDemo(demo) => {
                let dwell = demo.dwell;
                match demo.current.step(dt) {
                    Ok(ModuleStatus::Finished) => self.advance_auto_demo(),
                    Ok(ModuleStatus::Running) if demo.current.elapsed >= dwell => {
                        self.advance_auto_demo();
                    }
                    Ok(ModuleStatus::Running) => {}
                    Err(err) => self.handle_runtime_fault(&err),
                }
            }
        }
    }

    /// Logs a module or scene fault and returns to the menu.
    pub fn handle_runtime_fault(&mut self, err: &anyhow::Error) {
        let fault = OrchestrationError::runtime(self.mode_kind(), err);
        self.recover(&fault);
    }

    /// Applies the recovery that matches `fault`.
    ///
    /// Discovery and configuration faults were already handled where they were
    /// found, so they only surface on the status line.
    pub fn recover(&mut self, fault: &OrchestrationError) {
        match fault.recovery() {
            Recovery::SkipCandidate | Recovery::UseFilteredConfig | Recovery::ShowPlaceholder => {
                self.set_status(fault.to_string());
            }
            Recovery::ReturnToMenu => {
                tracing::error!("{fault}");
                self.set_status(truncate_error(&fault.to_string(), MAX_ERROR_CHARS));
                self.router.close_overlays();
                self.enter_menu();
            }
        }
    }

    /// Frame budget of the live mode.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        let display = &self.config.display;
        match self.mode_kind() {
            ModeKind::Boot | ModeKind::Menu | ModeKind::Settings => {
                DisplayConfig::frame_budget(display.menu_fps)
            }
            ModeKind::RunningModule | ModeKind::AmbientScene | ModeKind::AutoDemo => {
                DisplayConfig::frame_budget(display.module_fps)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_kind_display() {
        assert_eq!(ModeKind::RunningModule.to_string(), "RunningModule");
        assert_eq!(AppMode::Menu.kind(), ModeKind::Menu);
        assert_eq!(
            AppMode::Boot(BootSequence::new(Duration::from_secs(1))).kind(),
            ModeKind::Boot
        );
    }
}
