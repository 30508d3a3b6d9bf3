//! Settings panel.
//!
//! Sections of sliders, toggles, dropdowns and buttons over the settings
//! document. The panel never writes settings itself; it emits
//! [`SettingsEvent::Changed`] and the handler writes through the store.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::Value;

use super::component::Component;
use super::Theme;
use crate::settings::{SettingsStore, PROFILES, SCREEN_RATIOS, THEMES};
use crate::shortcuts::Action;

const SLIDER_WIDTH: usize = 20;
const ALL_CATEGORIES: &str = "All";

/// Where a dropdown takes its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Options {
    /// A fixed list
    Fixed(&'static [&'static str]),
    /// "All" plus every discovered scene category
    SceneCategories,
    /// Discovered scenes in the selected category
    Scenes,
}

/// Button behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Restart request, logged only
    Reboot,
    /// Restore default settings
    FactoryReset,
}

/// Kind of a settings row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Integer in `min..=max`
    Slider {
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
        /// Increment per key press
        step: i64,
    },
    /// Boolean switch
    Toggle,
    /// Cycles through options
    Dropdown(Options),
    /// Fires an action
    Button(ButtonAction),
    /// Shows a value
    ReadOnly,
}

/// One row of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    /// Row label
    pub label: &'static str,
    /// Settings section the value lives in
    pub section: &'static str,
    /// Settings key of the value
    pub key: &'static str,
    /// Row behaviour
    pub kind: ControlKind,
}

impl Control {
    const fn slider(label: &'static str, section: &'static str, key: &'static str) -> Self {
        Self {
            label,
            section,
            key,
            kind: ControlKind::Slider {
                min: 0,
                max: 100,
                step: 5,
            },
        }
    }

    const fn new(
        label: &'static str,
        section: &'static str,
        key: &'static str,
        kind: ControlKind,
    ) -> Self {
        Self {
            label,
            section,
            key,
            kind,
        }
    }
}

/// A titled group of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Section title
    pub title: &'static str,
    /// Rows in display order
    pub controls: &'static [Control],
}

/// All panel sections.
pub const SECTIONS: [Section; 7] = [
    Section {
        title: "Display",
        controls: &[
            Control::slider("Brightness", "Display", "brightness"),
            Control::new(
                "Screen Ratio",
                "Display",
                "screen_ratio",
                ControlKind::Dropdown(Options::Fixed(&SCREEN_RATIOS)),
            ),
        ],
    },
    Section {
        title: "Visuals",
        controls: &[
            Control::new(
                "Theme",
                "Visuals",
                "theme",
                ControlKind::Dropdown(Options::Fixed(&THEMES)),
            ),
            Control::slider("Animation Speed", "Visuals", "animation_speed"),
        ],
    },
    Section {
        title: "Scenes",
        controls: &[
            Control::new(
                "Category",
                "Scenes",
                "category_filter",
                ControlKind::Dropdown(Options::SceneCategories),
            ),
            Control::new(
                "Active Scene",
                "Scenes",
                "active_scene",
                ControlKind::Dropdown(Options::Scenes),
            ),
        ],
    },
    Section {
        title: "Sensors",
        controls: &[
            Control::new(
                "Presence Detection",
                "Sensors",
                "presence_detection",
                ControlKind::Toggle,
            ),
            Control::slider("Mic Sensitivity", "Sensors", "mic_sensitivity"),
        ],
    },
    Section {
        title: "Profiles",
        controls: &[Control::new(
            "Active Profile",
            "Profiles",
            "active_profile",
            ControlKind::Dropdown(Options::Fixed(&PROFILES)),
        )],
    },
    Section {
        title: "System",
        controls: &[
            Control::new("Version", "System", "version", ControlKind::ReadOnly),
            Control::new(
                "Reboot",
                "System",
                "reboot",
                ControlKind::Button(ButtonAction::Reboot),
            ),
            Control::new(
                "Factory Reset",
                "System",
                "factory_reset",
                ControlKind::Button(ButtonAction::FactoryReset),
            ),
        ],
    },
    Section {
        title: "Demo Mode",
        controls: &[
            Control::new("Enabled", "Demo", "enabled", ControlKind::Toggle),
            Control::new(
                "Demo Profile",
                "Demo",
                "demo_profile",
                ControlKind::Dropdown(Options::Fixed(&PROFILES)),
            ),
        ],
    },
];

/// What the panel asks the shell to do.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    /// Write `value` to `section.key`
    Changed {
        /// Settings section
        section: &'static str,
        /// Settings key
        key: &'static str,
        /// New value
        value: Value,
    },
    /// Reboot button pressed
    Reboot,
    /// Factory reset button pressed
    FactoryReset,
    /// Leave the panel
    Close,
}

/// Settings panel state.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    section: usize,
    control: usize,
    closed: bool,
    scenes: Vec<(String, String)>,
}

impl SettingsPanel {
    /// Creates a panel on the first section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets navigation for a fresh visit.
    pub fn open(&mut self) {
        self.section = 0;
        self.control = 0;
        self.closed = false;
    }

    /// Replaces the known `(name, category)` scene list.
    pub fn set_scenes(&mut self, scenes: Vec<(String, String)>) {
        self.scenes = scenes;
    }

    /// Index of the focused section.
    #[must_use]
    pub const fn section_index(&self) -> usize {
        self.section
    }

    /// Focused row.
    #[must_use]
    pub fn focused(&self) -> Option<&'static Control> {
        SECTIONS
            .get(self.section)
            .and_then(|section| section.controls.get(self.control))
    }

    /// Options a dropdown currently offers.
    #[must_use]
    pub fn options(&self, source: Options, settings: &SettingsStore) -> Vec<String> {
        match source {
            Options::Fixed(items) => items.iter().map(|s| (*s).to_string()).collect(),
            Options::SceneCategories => {
                let mut categories = vec![ALL_CATEGORIES.to_string()];
                for (_, category) in &self.scenes {
                    if !categories.contains(category) {
                        categories.push(category.clone());
                    }
                }
                categories
            }
            Options::Scenes => {
                let filter = settings
                    .get_str("Scenes", "category_filter")
                    .unwrap_or(ALL_CATEGORIES);
                self.scenes
                    .iter()
                    .filter(|(_, category)| filter == ALL_CATEGORIES || category == filter)
                    .map(|(name, _)| name.clone())
                    .collect()
            }
        }
    }

    fn adjust(&self, control: &Control, delta: i64, settings: &SettingsStore) -> Option<SettingsEvent> {
        let value = match control.kind {
            ControlKind::Slider { min, max, step } => {
                let current = slider_value(control, settings, min, max);
                let next = current.saturating_add(delta.saturating_mul(step)).clamp(min, max);
                if next == current {
                    return None;
                }
                Value::from(next)
            }
            ControlKind::Toggle => Value::from(!settings.get_bool(control.section, control.key)),
            ControlKind::Dropdown(source) => {
                let options = self.options(source, settings);
                if options.is_empty() {
                    return None;
                }
                let current = settings.get_str(control.section, control.key);
                let len = options.len();
                let idx = match current.and_then(|c| options.iter().position(|o| o == c)) {
                    Some(pos) if delta < 0 => (pos + len - 1) % len,
                    Some(pos) => (pos + 1) % len,
                    None => 0,
                };
                Value::from(options[idx].clone())
            }
            ControlKind::Button(_) | ControlKind::ReadOnly => return None,
        };
        Some(SettingsEvent::Changed {
            section: control.section,
            key: control.key,
            value,
        })
    }

    fn format_value(&self, control: &Control, settings: &SettingsStore) -> String {
        match control.kind {
            ControlKind::Slider { min, max, .. } => {
                let value = slider_value(control, settings, min, max);
                let span = (max - min).max(1);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let filled = (((value - min) * SLIDER_WIDTH as i64) / span).clamp(0, SLIDER_WIDTH as i64) as usize;
                format!(
                    "[{}{}] {value}",
                    "#".repeat(filled),
                    "-".repeat(SLIDER_WIDTH - filled)
                )
            }
            ControlKind::Toggle => {
                if settings.get_bool(control.section, control.key) {
                    "[ON]".to_string()
                } else {
                    "[OFF]".to_string()
                }
            }
            ControlKind::Dropdown(_) => format!(
                "< {} >",
                settings.get_str(control.section, control.key).unwrap_or("-")
            ),
            ControlKind::Button(_) => "[ Enter ]".to_string(),
            ControlKind::ReadOnly => settings
                .get(control.section, control.key)
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                .unwrap_or_default(),
        }
    }
}

/// Stored slider value, clamped into the slider's range.
fn slider_value(control: &Control, settings: &SettingsStore, min: i64, max: i64) -> i64 {
    settings
        .get_i64(control.section, control.key)
        .unwrap_or(min)
        .clamp(min, max)
}

impl Component for SettingsPanel {
    type Context = SettingsStore;
    type Event = SettingsEvent;

    fn handle_action(&mut self, action: Action, settings: &SettingsStore) -> Option<SettingsEvent> {
        let sections = SECTIONS.len();
        let controls = SECTIONS[self.section].controls.len();
        match action {
            Action::NextSection => {
                self.section = (self.section + 1) % sections;
                self.control = 0;
                None
            }
            Action::PreviousSection => {
                self.section = (self.section + sections - 1) % sections;
                self.control = 0;
                None
            }
            Action::NextControl => {
                self.control = (self.control + 1) % controls;
                None
            }
            Action::PreviousControl => {
                self.control = (self.control + controls - 1) % controls;
                None
            }
            Action::Decrease => self.adjust(self.focused()?, -1, settings),
            Action::Increase => self.adjust(self.focused()?, 1, settings),
            Action::Activate => {
                let control = self.focused()?;
                match control.kind {
                    ControlKind::Button(ButtonAction::Reboot) => Some(SettingsEvent::Reboot),
                    ControlKind::Button(ButtonAction::FactoryReset) => {
                        Some(SettingsEvent::FactoryReset)
                    }
                    _ => self.adjust(control, 1, settings),
                }
            }
            Action::CloseSettings => {
                self.closed = true;
                Some(SettingsEvent::Close)
            }
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, settings: &SettingsStore) {
        let [nav, body] =
            Layout::horizontal([Constraint::Length(18), Constraint::Fill(1)]).areas(area);
        let [rows, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(body);

        let nav_lines: Vec<Line> = SECTIONS
            .iter()
            .enumerate()
            .map(|(idx, section)| {
                let style = if idx == self.section {
                    Style::default()
                        .fg(theme.accent)
                        .bg(theme.highlight_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text_secondary)
                };
                Line::from(Span::styled(format!(" {} ", section.title), style))
            })
            .collect();
        f.render_widget(
            Paragraph::new(nav_lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Settings ")
                    .border_style(Style::default().fg(theme.primary)),
            ),
            nav,
        );

        let section = &SECTIONS[self.section];
        let control_lines: Vec<Line> = section
            .controls
            .iter()
            .enumerate()
            .map(|(idx, control)| {
                let focused = idx == self.control;
                let label_style = if focused {
                    Style::default().fg(theme.active).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                let value_style = match control.kind {
                    ControlKind::ReadOnly => Style::default().fg(theme.text_muted),
                    ControlKind::Button(ButtonAction::FactoryReset) => {
                        Style::default().fg(theme.error)
                    }
                    _ => Style::default().fg(theme.accent),
                };
                Line::from(vec![
                    Span::styled(if focused { "> " } else { "  " }, label_style),
                    Span::styled(format!("{:<20}", control.label), label_style),
                    Span::styled(self.format_value(control, settings), value_style),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(control_lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", section.title))
                    .border_style(Style::default().fg(theme.primary)),
            ),
            rows,
        );

        f.render_widget(
            Paragraph::new(Span::styled(
                " [ ] section  Up/Down select  Left/Right adjust  Enter activate  s close",
                Style::default().fg(theme.text_muted),
            )),
            help,
        );
    }

    fn should_close(&self) -> bool {
        self.closed
    }
}
