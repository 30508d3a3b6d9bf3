//! Boot screen.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};
use std::time::Duration;

use super::Theme;
use crate::constants::{OS_VERSION, TAGLINE};

const LOGO: [&str; 5] = [
    " __  __       _   _ ____                       ",
    "|  \\/  | ___ | |_(_) __ )  ___  __ _ _ __ ___  ",
    "| |\\/| |/ _ \\| __| |  _ \\ / _ \\/ _` | '_ ` _ \\ ",
    "| |  | | (_) | |_| | |_) |  __/ (_| | | | | | |",
    "|_|  |_|\\___/ \\__|_|____/ \\___|\\__,_|_| |_| |_|",
];

const STAGES: [&str; 5] = [
    "Initializing projection engine...",
    "Calibrating ambient sensors...",
    "Loading vertical modules...",
    "Discovering scenes...",
    "System ready",
];

/// Progress of the boot screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootSequence {
    elapsed: Duration,
    duration: Duration,
}

impl BootSequence {
    /// Creates a boot sequence lasting `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Advances the sequence. Returns `true` once it is complete.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.is_complete()
    }

    /// Whether the boot duration has elapsed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Completion ratio in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Message for the current boot stage.
    #[must_use]
    pub fn stage_message(&self) -> &'static str {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let idx = (self.progress() * (STAGES.len() - 1) as f64).floor() as usize;
        STAGES[idx.min(STAGES.len() - 1)]
    }
}

/// Draws the boot screen.
pub fn render_boot(f: &mut Frame, area: Rect, boot: &BootSequence, theme: &Theme) {
    let [_, logo, tagline, gauge, stage, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(LOGO.len() as u16 + 1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .areas(area);

    let logo_lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(theme.primary))))
        .collect();
    f.render_widget(Paragraph::new(logo_lines).alignment(Alignment::Center), logo);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                TAGLINE,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(OS_VERSION, Style::default().fg(theme.text_muted))),
        ])
        .alignment(Alignment::Center),
        tagline,
    );

    let [_, bar, _] = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(50),
        Constraint::Percentage(25),
    ])
    .areas(gauge);
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.primary).bg(theme.surface))
            .ratio(boot.progress()),
        bar,
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            boot.stage_message(),
            Style::default().fg(theme.text_secondary),
        )))
        .alignment(Alignment::Center),
        stage,
    );
}
