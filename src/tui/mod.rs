//! Terminal shell: state, frame loop and rendering.
//!
//! [`AppState`] is the single source of truth. Each frame the loop drains
//! input through the [`GlobalCommandRouter`], hands the rest to the live
//! mode, advances the mode by the wall-clock delta and draws it with any open
//! overlay on top.

// Input handlers use Result for consistency even when they never fail
#![allow(clippy::unnecessary_wraps)]
// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

pub mod boot;
pub mod component;
pub mod handlers;
pub mod menu;
pub mod mode;
pub mod overlay;
pub mod router;
pub mod settings_panel;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal, TerminalOptions, Viewport,
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::{Config, DisplayMode};
use crate::error::OrchestrationError;
use crate::modules::loader::{catch_fault, truncate_error};
use crate::scenes::SceneManager;
use crate::settings::{SettingsStore, SECTION_VISUALS};
use crate::verticals::VerticalOrderingConfig;

pub use boot::BootSequence;
pub use component::Component;
pub use menu::{MainMenu, MenuEvent};
pub use mode::{AppMode, ModeKind, ModeRequest};
pub use router::{GlobalCommandRouter, RouteOutcome};
pub use settings_panel::{SettingsEvent, SettingsPanel};
pub use theme::Theme;

/// Longest status line shown under the menu.
pub const STATUS_MAX_CHARS: usize = 80;

/// Height of the inline viewport in windowed mode.
const WINDOWED_HEIGHT: u16 = 24;

static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Surface assumed until the first frame reports the real one.
const DEFAULT_SURFACE: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
};

/// Application state - single source of truth.
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    /// Persistent user settings
    pub settings: SettingsStore,
    /// Discovered scenes and the active one
    pub scenes: SceneManager,
    /// Launchable verticals, fixed for the session
    pub verticals: VerticalOrderingConfig,
    /// Global key routing, overlays and pointer activity
    pub router: GlobalCommandRouter,
    /// Live mode
    pub mode: AppMode,
    /// Main menu navigation
    pub menu: MainMenu,
    /// Settings panel navigation
    pub settings_panel: SettingsPanel,
    /// Active theme
    pub theme: Theme,
    /// One-line message under the menu
    pub status_message: Option<String>,
    /// Vertical that ran last
    pub last_vertical: Option<String>,
    /// Drawing surface of the last frame
    pub surface: Rect,
    /// Set when the user quits
    pub should_quit: bool,
}

impl AppState {
    /// Creates the shell state.
    ///
    /// Starts on the boot screen unless `skip_boot` is set.
    #[must_use]
    pub fn new(
        config: Config,
        settings: SettingsStore,
        scenes: SceneManager,
        verticals: VerticalOrderingConfig,
        now: Instant,
        skip_boot: bool,
    ) -> Self {
        let router = GlobalCommandRouter::new(now, config.display.cursor_idle());
        let theme = Theme::from_setting(settings.get_str(SECTION_VISUALS, "theme"));
        let mode = if skip_boot {
            AppMode::Menu
        } else {
            AppMode::Boot(BootSequence::new(config.display.boot_duration()))
        };
        let mut settings_panel = SettingsPanel::new();
        settings_panel.set_scenes(scenes.scene_list());

        tracing::info!(
            "shell ready: {} vertical(s), {} scene(s), starting in {}",
            verticals.len(),
            scenes.registry().len(),
            mode.kind()
        );

        let mut state = Self {
            config,
            settings,
            scenes,
            verticals,
            router,
            mode,
            menu: MainMenu::new(),
            settings_panel,
            theme,
            status_message: None,
            last_vertical: None,
            surface: DEFAULT_SURFACE,
            should_quit: false,
        };

        let startup_faults: Vec<OrchestrationError> = state
            .scenes
            .registry()
            .skipped()
            .iter()
            .chain(state.verticals.warnings())
            .cloned()
            .collect();
        for fault in &startup_faults {
            state.recover(fault);
        }
        state
    }

    /// Sets the status line, bounded to [`STATUS_MAX_CHARS`].
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(truncate_error(&message, STATUS_MAX_CHARS));
    }

    /// Records the drawing surface reported by the terminal.
    pub fn set_surface(&mut self, area: Rect) {
        self.surface = area;
    }

    /// Routes one input event, then applies what the router decided.
    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.status_message = None;
            }
        }

        let current = self.current_vertical().map(str::to_owned);
        match self
            .router
            .route(event, now, &self.verticals, current.as_deref())
        {
            RouteOutcome::Consumed => {}
            RouteOutcome::Request(request) => self.apply(request),
            RouteOutcome::PassThrough(event) => {
                if let Err(err) = handlers::handle_mode_event(self, &event) {
                    tracing::warn!("input handling failed: {err:#}");
                    self.set_status(format!("{err}"));
                }
            }
        }
    }
}

/// Setup terminal for TUI.
///
/// Fullscreen takes the alternate screen; windowed draws into an inline
/// viewport below the prompt.
pub fn setup_terminal(mode: DisplayMode) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    let terminal = match mode {
        DisplayMode::Fullscreen => {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
                .context("Failed to enter alternate screen")?;
            Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?
        }
        DisplayMode::Windowed => {
            execute!(stdout, EnableMouseCapture).context("Failed to enable mouse capture")?;
            Terminal::with_options(
                CrosstermBackend::new(stdout),
                TerminalOptions {
                    viewport: Viewport::Inline(WINDOWED_HEIGHT),
                },
            )
            .context("Failed to create terminal")?
        }
    };
    TERMINAL_ACTIVE.store(true, Ordering::SeqCst);
    Ok(terminal)
}

/// Whether the shell currently owns the terminal.
///
/// While it does, anything written to stderr lands on top of the frame.
pub fn terminal_active() -> bool {
    TERMINAL_ACTIVE.load(Ordering::SeqCst)
}

/// Restore terminal to normal state
pub fn restore_terminal(
    mut terminal: Terminal<CrosstermBackend<io::Stdout>>,
    mode: DisplayMode,
) -> Result<()> {
    TERMINAL_ACTIVE.store(false, Ordering::SeqCst);
    disable_raw_mode().context("Failed to disable raw mode")?;
    match mode {
        DisplayMode::Fullscreen => execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?,
        DisplayMode::Windowed => execute!(terminal.backend_mut(), DisableMouseCapture)
            .context("Failed to disable mouse capture")?,
    }
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main frame loop. Returns when the user quits or the terminal fails.
pub fn run_tui<B: Backend>(state: &mut AppState, terminal: &mut Terminal<B>) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            state.handle_event(&event, Instant::now());
        }
        if state.should_quit {
            break;
        }

        let now = Instant::now();
        let dt = now.saturating_duration_since(last_frame);
        last_frame = now;

        state.set_surface(terminal.get_frame().area());
        state.update(dt);
        draw_frame(terminal, state, now)?;
        if state.should_quit {
            break;
        }

        let remaining = state.frame_budget().saturating_sub(now.elapsed());
        if event::poll(remaining)? {
            let event = event::read()?;
            state.handle_event(&event, Instant::now());
        }
    }

    tracing::info!("frame loop finished");
    Ok(())
}

/// Draws one frame and syncs the hardware cursor with the pointer.
///
/// Cursor visibility is written to the terminal only when the router reports
/// a change. A render error is handled as a runtime fault; only terminal I/O
/// errors are returned.
pub fn draw_frame<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    now: Instant,
) -> Result<()> {
    terminal.autoresize()?;
    let mut frame = terminal.get_frame();
    let rendered = render(&mut frame, state);
    terminal.flush()?;
    terminal.swap_buffers();

    match state.router.refresh_cursor(now) {
        Some(true) => terminal.show_cursor()?,
        Some(false) => terminal.hide_cursor()?,
        None => {}
    }
    let activity = state.router.activity();
    if activity.cursor_visible {
        if let Some((x, y)) = activity.pointer {
            if x < state.surface.right() && y < state.surface.bottom() {
                terminal.set_cursor_position(Position::new(x, y))?;
            }
        }
    }
    terminal.backend_mut().flush()?;

    if let Err(err) = rendered {
        state.handle_runtime_fault(&err);
    }
    Ok(())
}

/// Draws the live mode, then the open overlay.
///
/// Errors come from module or scene rendering; the caller treats them as
/// runtime faults.
pub fn render(f: &mut Frame, state: &AppState) -> Result<()> {
    let area = f.area();
    let theme = &state.theme;
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    match &state.mode {
        AppMode::Boot(sequence) => boot::render_boot(f, area, sequence, theme),
        AppMode::Menu => {
            let [main, status] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            state.menu.render(f, main, theme, &state.verticals);
            render_status_line(f, status, state);
        }
        AppMode::RunningModule(running) => {
            catch_fault(|| running.module.render(f, area, theme))?;
        }
        AppMode::Settings => state.settings_panel.render(f, area, theme, &state.settings),
        AppMode::AmbientScene => render_ambient(f, area, state)?,
        AppMode::AutoDemo(demo) => {
            let [main, banner] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            catch_fault(|| demo.current.module.render(f, main, theme))?;
            f.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        " AUTO DEMO ",
                        Style::default()
                            .fg(theme.background)
                            .bg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" {}  (Esc to stop)", demo.current.name),
                        Style::default().fg(theme.text_secondary),
                    ),
                ])),
                banner,
            );
        }
    }

    let overlays = state.router.overlays();
    if overlays.quick_settings {
        overlay::render_quick_settings(f, area, state);
    } else if overlays.master_menu {
        overlay::render_master_menu(f, area, state);
    }

    Ok(())
}

fn render_status_line(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(message) = &state.status_message else {
        return;
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            message.as_str(),
            Style::default().fg(state.theme.warning),
        ))
        .alignment(Alignment::Center),
        area,
    );
}

fn render_ambient(f: &mut Frame, area: Rect, state: &AppState) -> Result<()> {
    let theme = &state.theme;
    let [scene_area, label, help] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    match state.scenes.active_scene_name() {
        Some(name) => {
            catch_fault(|| state.scenes.render_active_scene(f, scene_area, theme))?;
            f.render_widget(
                Paragraph::new(Span::styled(
                    format!("Scene: {name}"),
                    Style::default().fg(theme.primary),
                ))
                .alignment(Alignment::Center),
                label,
            );
        }
        None => {
            let message = state.status_message.as_deref().unwrap_or("No scenes found");
            f.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(theme.warning)))
                    .alignment(Alignment::Center),
                centered_rect(60, 20, scene_area),
            );
        }
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            "<- -> change scene  1-9 jump  b back",
            Style::default().fg(theme.text_muted),
        ))
        .alignment(Alignment::Center),
        help,
    );
    Ok(())
}

/// Helper to create a centered rectangle
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
