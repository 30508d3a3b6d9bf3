//! Main menu listing the active verticals.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::component::Component;
use super::Theme;
use crate::constants::{OS_VERSION, TAGLINE};
use crate::shortcuts::Action;
use crate::verticals::{metadata, VerticalEntry, VerticalOrderingConfig};

/// What the menu asks the shell to do.
#[derive(Debug, Clone)]
pub enum MenuEvent {
    /// Run the highlighted vertical
    Run(VerticalEntry),
    /// Open the settings panel
    OpenSettings,
    /// Show the ambient scene
    OpenAmbient,
    /// Start the auto demo
    StartAutoDemo,
    /// Scan the scenes directory again
    RescanScenes,
    /// Leave the application
    Quit,
}

/// Main menu state.
#[derive(Debug, Clone, Default)]
pub struct MainMenu {
    selected: usize,
}

impl MainMenu {
    /// Creates a menu with the first entry highlighted.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: 0 }
    }

    /// Index of the highlighted entry.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Highlights entry `index`.
    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }
}

impl Component for MainMenu {
    type Context = VerticalOrderingConfig;
    type Event = MenuEvent;

    fn handle_action(&mut self, action: Action, verticals: &Self::Context) -> Option<MenuEvent> {
        let count = verticals.len();
        match action {
            Action::MenuUp if count > 0 => {
                self.selected = (self.selected + count - 1) % count;
                None
            }
            Action::MenuDown if count > 0 => {
                self.selected = (self.selected + 1) % count;
                None
            }
            Action::MenuSelect => verticals
                .active_entries()
                .get(self.selected)
                .cloned()
                .map(MenuEvent::Run),
            Action::OpenSettings => Some(MenuEvent::OpenSettings),
            Action::OpenAmbient => Some(MenuEvent::OpenAmbient),
            Action::StartAutoDemo => Some(MenuEvent::StartAutoDemo),
            Action::RescanScenes => Some(MenuEvent::RescanScenes),
            Action::Quit => Some(MenuEvent::Quit),
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, verticals: &Self::Context) {
        let [header, list, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(area);

        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    OS_VERSION,
                    Style::default()
                        .fg(theme.primary)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(TAGLINE, Style::default().fg(theme.text_secondary))),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM)),
            header,
        );

        let lines: Vec<Line> = if verticals.is_empty() {
            vec![Line::from(Span::styled(
                "No verticals available",
                Style::default().fg(theme.warning),
            ))]
        } else {
            verticals
                .active_entries()
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    let meta = metadata(&entry.display_name);
                    let highlighted = idx == self.selected;
                    let row_style = if highlighted {
                        Style::default()
                            .bg(theme.highlight_bg)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::styled(
                            if highlighted { "> " } else { "  " },
                            row_style.fg(theme.accent),
                        ),
                        Span::styled(format!("[{}] ", entry.key), row_style.fg(theme.text_muted)),
                        Span::styled(format!("{} ", meta.symbol), row_style.fg(meta.color)),
                        Span::styled(format!("{:<12}", entry.display_name), row_style.fg(theme.text)),
                        Span::styled(meta.description, row_style.fg(theme.text_secondary)),
                    ])
                })
                .collect()
        };
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Verticals ")
                    .border_style(Style::default().fg(theme.primary)),
            ),
            list,
        );

        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "1-9 run  Enter select  s settings  b ambient  a demo  r rescan  q quit",
                Style::default().fg(theme.text_muted),
            )))
            .alignment(Alignment::Center),
            footer,
        );
    }
}
